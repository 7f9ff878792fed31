use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::domain::{Category, PageRequest, PageResult, Question, QuizOutcome};

pub type CategoryLabels = BTreeMap<i64, String>;

pub fn category_labels(categories: &[Category]) -> CategoryLabels {
    categories
        .iter()
        .map(|c| (c.id, c.label.clone()))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: CategoryLabels,
}

#[derive(Debug, Serialize)]
pub struct QuestionPageResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: u64,
    pub page: u64,
    pub total_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryLabels>,
    pub current_category: Option<String>,
}

impl QuestionPageResponse {
    pub fn from_page(result: PageResult<Question>, request: PageRequest) -> Self {
        Self {
            success: true,
            total_pages: result.total_pages(request.page_size()),
            page: request.page_number(),
            questions: result.items,
            total_questions: result.total_count,
            categories: None,
            current_category: None,
        }
    }

    pub fn with_categories(mut self, categories: CategoryLabels) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_current_category(mut self, label: Option<String>) -> Self {
        self.current_category = label;
        self
    }
}

#[derive(Debug, Serialize)]
pub struct CreateQuestionResponse {
    pub success: bool,
    pub created: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteQuestionResponse {
    pub success: bool,
    pub deleted: i64,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    pub exhausted: bool,
}

impl From<QuizOutcome> for QuizResponse {
    fn from(outcome: QuizOutcome) -> Self {
        match outcome {
            QuizOutcome::Question(question) => QuizResponse {
                success: true,
                question: Some(question),
                exhausted: false,
            },
            QuizOutcome::Exhausted => QuizResponse {
                success: true,
                question: None,
                exhausted: true,
            },
        }
    }
}
