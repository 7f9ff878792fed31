use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::{
        domain::Category,
        dto::response::{category_labels, CategoryLabels},
    },
    repositories::CategoryRepository,
};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.repository.find_all().await
    }

    pub async fn labels(&self) -> AppResult<CategoryLabels> {
        let categories = self.list().await?;
        Ok(category_labels(&categories))
    }

    /// Label of a category, or `None` when the id is unknown.
    pub async fn label_of(&self, id: i64) -> AppResult<Option<String>> {
        let category = self.repository.find_by_id(id).await?;
        Ok(category.map(|c| c.label))
    }
}
