pub mod category_handler;
pub mod health_handler;
pub mod question_handler;
pub mod quiz_handler;

use std::str::FromStr;

use actix_web::{web, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppResult};

/// Registers every route.
///
/// Scoped handlers read their query, path and body by hand after
/// `authorize`, so a caller without a valid credential always gets 401
/// before any input is validated.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_handler::health_check)
    .service(health_handler::health_check_ready)
    .service(category_handler::get_categories)
    .service(category_handler::get_category_questions)
    .service(question_handler::list_questions)
    .service(question_handler::search_questions)
    .service(question_handler::create_question)
    .service(question_handler::delete_question)
    .service(quiz_handler::play_quiz);
}

pub(crate) fn bearer(credentials: &Option<BearerAuth>) -> Option<&str> {
    credentials.as_ref().map(|c| c.token())
}

pub(crate) fn parse_query<T: DeserializeOwned>(req: &HttpRequest) -> AppResult<T> {
    web::Query::<T>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .map_err(|e| AppError::ValidationError(e.to_string()))
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("Json deserialize error: {}", e)))
}

pub(crate) fn parse_path<T: FromStr>(req: &HttpRequest, name: &str) -> AppResult<T> {
    req.match_info()
        .get(name)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| AppError::ValidationError(format!("invalid path segment '{}'", name)))
}
