pub const GET_CATEGORIES: &str = "get:categories";
pub const GET_QUESTIONS: &str = "get:questions";
pub const POST_QUESTIONS: &str = "post:questions";
pub const DELETE_QUESTIONS: &str = "delete:questions";
pub const PLAY_QUIZZES: &str = "play:quizzes";
