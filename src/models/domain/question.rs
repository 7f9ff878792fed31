use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored trivia question. The wire and store field names are `question`
/// and `category`, which the web client reads directly.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: i64,
    #[serde(rename = "question")]
    pub text: String,
    pub answer: String,
    pub difficulty: i32,
    #[serde(rename = "category")]
    pub category_id: i64,
}

/// A question that passed payload validation but has no id yet.
#[derive(Clone, Debug, PartialEq, Eq, Validate)]
pub struct NewQuestion {
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub text: String,

    #[validate(length(min = 1, message = "answer must not be empty"))]
    pub answer: String,

    pub difficulty: i32,

    pub category_id: i64,
}

impl NewQuestion {
    pub fn with_id(self, id: i64) -> Question {
        Question {
            id,
            text: self.text,
            answer: self.answer,
            difficulty: self.difficulty,
            category_id: self.category_id,
        }
    }
}

/// Criteria shared by listing, searching and quiz selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub category_id: Option<i64>,
    pub search_term: Option<String>,
    pub excluded_ids: BTreeSet<i64>,
}

impl QuestionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_category(category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub fn matching(search_term: impl Into<String>) -> Self {
        Self {
            search_term: Some(search_term.into()),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.excluded_ids.extend(ids);
        self
    }

    /// The search term, if it constrains anything. An empty term matches all.
    pub fn effective_search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|term| !term.is_empty())
    }

    pub fn matches(&self, question: &Question) -> bool {
        if let Some(category_id) = self.category_id {
            if question.category_id != category_id {
                return false;
            }
        }

        if self.excluded_ids.contains(&question.id) {
            return false;
        }

        match self.effective_search_term() {
            Some(term) => question
                .text
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        }
    }
}

/// Result of asking for a quiz question the player has not seen yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Question(Question),
    Exhausted,
}

impl QuizOutcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, QuizOutcome::Exhausted)
    }
}
