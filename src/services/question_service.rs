use std::sync::Arc;

use rand::seq::IndexedRandom;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{NewQuestion, PageRequest, PageResult, Question, QuestionFilter, QuizOutcome},
        dto::request::CreateQuestionPayload,
    },
    repositories::QuestionRepository,
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    /// A page past the end is a valid, empty page that still carries the total.
    pub async fn list(
        &self,
        filter: &QuestionFilter,
        page: PageRequest,
    ) -> AppResult<PageResult<Question>> {
        let (items, total_count) = self
            .repository
            .find_page(filter, page.skip(), page.page_size())
            .await?;

        Ok(PageResult::new(items, total_count))
    }

    pub async fn get(&self, id: i64) -> AppResult<Question> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    pub async fn create(&self, payload: CreateQuestionPayload) -> AppResult<i64> {
        let question = NewQuestion::try_from(payload)?;
        let created = self.repository.insert(question).await?;

        log::info!(
            "Created question {} in category {}",
            created.id,
            created.category_id
        );
        Ok(created.id)
    }

    pub async fn delete(&self, id: i64) -> AppResult<i64> {
        let removed = self
            .repository
            .delete_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))?;

        log::info!("Deleted question {}", removed.id);
        Ok(removed.id)
    }

    pub async fn pick_random_unseen(&self, filter: &QuestionFilter) -> AppResult<QuizOutcome> {
        let candidates = self.repository.find_matching(filter).await?;

        let picked = candidates
            .iter()
            .filter(|q| !filter.excluded_ids.contains(&q.id))
            .collect::<Vec<_>>()
            .choose(&mut rand::rng())
            .map(|q| (*q).clone());

        Ok(match picked {
            Some(question) => QuizOutcome::Question(question),
            None => QuizOutcome::Exhausted,
        })
    }
}
