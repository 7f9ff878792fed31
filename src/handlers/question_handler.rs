use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::{
    app_state::AppState,
    auth::scopes,
    errors::AppError,
    handlers::{bearer, parse_json, parse_path, parse_query},
    middleware::get_request_id,
    models::{
        domain::QuestionFilter,
        dto::{
            request::{CreateQuestionPayload, PageParams, SearchRequest},
            response::{CreateQuestionResponse, DeleteQuestionResponse, QuestionPageResponse},
        },
    },
};

#[get("/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    req: HttpRequest,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, AppError> {
    state
        .access_guard
        .authorize(bearer(&credentials), scopes::GET_QUESTIONS)
        .await?;

    let page = parse_query::<PageParams>(&req)?
        .to_page_request(state.config.questions_per_page)?;
    let questions = state
        .question_service
        .list(&QuestionFilter::all(), page)
        .await?;
    let categories = state.category_service.labels().await?;

    Ok(HttpResponse::Ok()
        .json(QuestionPageResponse::from_page(questions, page).with_categories(categories)))
}

#[post("/questions/search")]
pub async fn search_questions(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, AppError> {
    state
        .access_guard
        .authorize(bearer(&credentials), scopes::GET_QUESTIONS)
        .await?;

    let page = parse_query::<PageParams>(&req)?
        .to_page_request(state.config.questions_per_page)?;
    let request: SearchRequest = parse_json(&body)?;
    let questions = state
        .question_service
        .list(&request.to_filter(), page)
        .await?;

    Ok(HttpResponse::Ok().json(QuestionPageResponse::from_page(questions, page)))
}

#[post("/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, AppError> {
    let claim = state
        .access_guard
        .authorize(bearer(&credentials), scopes::POST_QUESTIONS)
        .await?;

    let payload: CreateQuestionPayload = parse_json(&body)?;
    let created = state.question_service.create(payload).await?;

    log::info!(
        "Request {} by '{}' created question {}",
        get_request_id(&req).unwrap_or_default(),
        claim.subject,
        created
    );

    Ok(HttpResponse::Created().json(CreateQuestionResponse {
        success: true,
        created,
    }))
}

#[delete("/questions/{question_id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    req: HttpRequest,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, AppError> {
    let claim = state
        .access_guard
        .authorize(bearer(&credentials), scopes::DELETE_QUESTIONS)
        .await?;

    let question_id: i64 = parse_path(&req, "question_id")?;
    let deleted = state.question_service.delete(question_id).await?;

    log::info!(
        "Request {} by '{}' deleted question {}",
        get_request_id(&req).unwrap_or_default(),
        claim.subject,
        deleted
    );

    Ok(HttpResponse::Ok().json(DeleteQuestionResponse {
        success: true,
        deleted,
    }))
}
