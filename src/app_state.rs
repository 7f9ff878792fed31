use std::sync::Arc;

use crate::{
    auth::AccessGuard,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        CategoryRepository, MongoCategoryRepository, MongoQuestionRepository, QuestionRepository,
    },
    services::{CategoryService, QuestionService},
};

#[derive(Clone)]
pub struct AppState {
    pub question_service: Arc<QuestionService>,
    pub category_service: Arc<CategoryService>,
    pub access_guard: Arc<AccessGuard>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let question_repository = MongoQuestionRepository::new(&db, &config.questions_collection);
        question_repository.ensure_indexes().await?;

        let category_repository =
            MongoCategoryRepository::new(&db, &config.categories_collection);
        category_repository.ensure_indexes().await?;

        let access_guard = AccessGuard::from_config(&config);

        Ok(Self::from_parts(
            Arc::new(question_repository),
            Arc::new(category_repository),
            access_guard,
            db,
            config,
        ))
    }

    pub fn from_parts(
        question_repository: Arc<dyn QuestionRepository>,
        category_repository: Arc<dyn CategoryRepository>,
        access_guard: AccessGuard,
        db: Database,
        config: Config,
    ) -> Self {
        Self {
            question_service: Arc::new(QuestionService::new(question_repository)),
            category_service: Arc::new(CategoryService::new(category_repository)),
            access_guard: Arc::new(access_guard),
            db,
            config: Arc::new(config),
        }
    }
}
