#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use trivia_server::{
    errors::AppResult,
    models::domain::{Category, NewQuestion, Question, QuestionFilter},
    repositories::{CategoryRepository, QuestionRepository},
};

/// Question store keyed by id, so iteration is already in ascending id order.
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<BTreeMap<i64, Question>>>,
    next_id: Arc<RwLock<i64>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    pub async fn seed(&self, category_id: i64, count: usize) -> Vec<i64> {
        let mut ids = Vec::with_capacity(count);
        for n in 0..count {
            let question = self
                .insert(NewQuestion {
                    text: format!("Category {} question {}", category_id, n),
                    answer: format!("Answer {}", n),
                    difficulty: (n % 5) as i32 + 1,
                    category_id,
                })
                .await
                .expect("in-memory insert");
            ids.push(question.id);
        }
        ids
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_page(
        &self,
        filter: &QuestionFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Question>, u64)> {
        let items = self.find_matching(filter).await?;
        let total = items.len() as u64;

        let page = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_matching(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(questions
            .values()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        let questions = self.questions.read().await;
        Ok(questions.get(&id).cloned())
    }

    async fn insert(&self, question: NewQuestion) -> AppResult<Question> {
        let mut next_id = self.next_id.write().await;
        let question = question.with_id(*next_id);
        *next_id += 1;

        let mut questions = self.questions.write().await;
        questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        let mut questions = self.questions.write().await;
        Ok(questions.remove(&id))
    }
}

pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<BTreeMap<i64, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn with(categories: Vec<Category>) -> Self {
        Self {
            categories: Arc::new(RwLock::new(
                categories.into_iter().map(|c| (c.id, c)).collect(),
            )),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> AppResult<Vec<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }
}

pub fn trivia_categories() -> Vec<Category> {
    vec![
        Category::new(1, "Science"),
        Category::new(2, "Art"),
        Category::new(3, "Geography"),
        Category::new(4, "History"),
        Category::new(5, "Entertainment"),
        Category::new(6, "Sports"),
    ]
}
