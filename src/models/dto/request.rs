use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{NewQuestion, PageRequest, QuestionFilter};

pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PageParams {
    #[validate(range(min = 1))]
    pub page: Option<u64>,

    /// Values above [`MAX_PAGE_SIZE`] are clamped rather than rejected.
    #[validate(range(min = 1))]
    pub limit: Option<u64>,
}

impl PageParams {
    pub fn to_page_request(&self, default_page_size: u64) -> AppResult<PageRequest> {
        self.validate()?;
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(default_page_size).min(MAX_PAGE_SIZE),
        )
    }
}

/// Raw body of `POST /questions`. Fields stay untyped so that a missing or
/// mistyped field surfaces as a validation error instead of a body parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateQuestionPayload {
    pub question: Option<Value>,
    pub answer: Option<Value>,
    pub difficulty: Option<Value>,
    pub category: Option<Value>,
}

impl TryFrom<CreateQuestionPayload> for NewQuestion {
    type Error = AppError;

    fn try_from(payload: CreateQuestionPayload) -> AppResult<Self> {
        let question = NewQuestion {
            text: required_string("question", payload.question)?,
            answer: required_string("answer", payload.answer)?,
            difficulty: required_integer("difficulty", payload.difficulty)?,
            category_id: required_integer("category", payload.category)?,
        };
        question.validate()?;
        Ok(question)
    }
}

fn required_string(field: &str, value: Option<Value>) -> AppResult<String> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => Err(missing(field)),
        Some(_) => Err(AppError::ValidationError(format!(
            "field '{}' must be a string",
            field
        ))),
    }
}

// Numeric strings are accepted because form selects submit category ids as text.
fn required_integer<T: TryFrom<i64>>(field: &str, value: Option<Value>) -> AppResult<T> {
    let not_numeric =
        || AppError::ValidationError(format!("field '{}' must be an integer", field));

    let raw = match value {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| not_numeric())?,
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| not_numeric())?,
        Some(Value::Null) | None => return Err(missing(field)),
        Some(_) => return Err(not_numeric()),
    };

    T::try_from(raw).map_err(|_| not_numeric())
}

fn missing(field: &str) -> AppError {
    AppError::ValidationError(format!("missing required field '{}'", field))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

impl SearchRequest {
    pub fn to_filter(&self) -> QuestionFilter {
        QuestionFilter::matching(self.search_term.clone().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Vec<i64>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    /// Category id 0 stands for "all categories".
    pub fn to_filter(&self) -> QuestionFilter {
        let category_id = self
            .quiz_category
            .as_ref()
            .map(|c| c.id)
            .filter(|id| *id != 0);

        QuestionFilter {
            category_id,
            ..QuestionFilter::default()
        }
        .excluding(self.previous_questions.iter().copied())
    }
}
