pub mod category;
pub mod page;
pub mod question;
pub use category::Category;
pub use page::{PageRequest, PageResult};
pub use question::{NewQuestion, Question, QuestionFilter, QuizOutcome};
