pub mod category_service;
pub mod question_service;

pub use category_service::CategoryService;
pub use question_service::QuestionService;
