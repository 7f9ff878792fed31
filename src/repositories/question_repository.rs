use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use serde::Deserialize;

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{NewQuestion, Question, QuestionFilter},
};

const COUNTERS_COLLECTION: &str = "counters";
const QUESTION_SEQUENCE: &str = "questions";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Returns one id-ordered slice of the matching set plus the size of the whole set.
    async fn find_page(
        &self,
        filter: &QuestionFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Question>, u64)>;
    async fn find_matching(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Question>>;
    async fn insert(&self, question: NewQuestion) -> AppResult<Question>;
    /// Removes the question atomically and returns it, or `None` if it did not exist.
    async fn delete_by_id(&self, id: i64) -> AppResult<Option<Question>>;
}

#[derive(Debug, Deserialize)]
struct Sequence {
    seq: i64,
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
    counters: Collection<Sequence>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.get_collection(collection_name),
            counters: db.get_collection(COUNTERS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1, "id": 1 })
            .options(
                IndexOptions::builder()
                    .name("category_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(category_index).await?;

        log::info!("Successfully created indexes for questions collection");

        self.seed_sequence().await
    }

    /// Raises the id sequence to the highest stored id so imported fixtures
    /// never collide with new inserts.
    async fn seed_sequence(&self) -> AppResult<()> {
        let highest = self
            .collection
            .find_one(doc! {})
            .sort(doc! { "id": -1 })
            .await?;
        let max_id = highest.map(|q| q.id).unwrap_or(0);

        self.counters
            .update_one(doc! { "_id": QUESTION_SEQUENCE }, sequence_floor(max_id))
            .upsert(true)
            .await?;

        log::info!("Question id sequence starts above {}", max_id);
        Ok(())
    }

    async fn next_id(&self) -> AppResult<i64> {
        let sequence = self
            .counters
            .find_one_and_update(
                doc! { "_id": QUESTION_SEQUENCE },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        // With upsert + ReturnDocument::After the driver always hands back a document.
        Ok(sequence.map(|s| s.seq).unwrap_or(1))
    }
}

/// Update that never lowers the sequence below `max_id`.
pub fn sequence_floor(max_id: i64) -> Document {
    doc! { "$max": { "seq": max_id } }
}

/// Skip and limit for one page, or `None` when the page starts past the
/// matching set. Keeping `offset < total` also keeps it within `i64`.
pub fn page_window(offset: u64, limit: u64, total: u64) -> Option<(u64, i64)> {
    if offset >= total {
        return None;
    }
    Some((offset, i64::try_from(limit).unwrap_or(i64::MAX)))
}

/// Translates a filter into a MongoDB query document.
pub fn filter_document(filter: &QuestionFilter) -> Document {
    let mut query = doc! {};

    if let Some(category_id) = filter.category_id {
        query.insert("category", category_id);
    }

    if let Some(term) = filter.effective_search_term() {
        query.insert(
            "question",
            doc! { "$regex": regex::escape(term), "$options": "i" },
        );
    }

    if !filter.excluded_ids.is_empty() {
        let excluded: Vec<i64> = filter.excluded_ids.iter().copied().collect();
        query.insert("id", doc! { "$nin": excluded });
    }

    query
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn find_page(
        &self,
        filter: &QuestionFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Question>, u64)> {
        let query = filter_document(filter);

        let total = self.collection.count_documents(query.clone()).await?;

        let Some((skip, limit)) = page_window(offset, limit, total) else {
            return Ok((Vec::new(), total));
        };

        let items: Vec<Question> = self
            .collection
            .find(query)
            .sort(doc! { "id": 1 })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    async fn find_matching(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>> {
        let questions = self
            .collection
            .find(filter_document(filter))
            .sort(doc! { "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn insert(&self, question: NewQuestion) -> AppResult<Question> {
        let question = question.with_id(self.next_id().await?);
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        let removed = self
            .collection
            .find_one_and_delete(doc! { "id": id })
            .await?;
        Ok(removed)
    }
}
