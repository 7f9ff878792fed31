use actix_web::{post, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::{
    app_state::AppState,
    auth::scopes,
    errors::AppError,
    handlers::{bearer, parse_json},
    models::dto::{request::QuizRequest, response::QuizResponse},
};

/// Serves a random question the player has not seen yet. Running out of
/// questions is a successful response with `exhausted: true`.
#[post("/quizzes")]
pub async fn play_quiz(
    state: web::Data<AppState>,
    body: web::Bytes,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, AppError> {
    state
        .access_guard
        .authorize(bearer(&credentials), scopes::PLAY_QUIZZES)
        .await?;

    let request: QuizRequest = parse_json(&body)?;
    let outcome = state
        .question_service
        .pick_random_unseen(&request.to_filter())
        .await?;

    Ok(HttpResponse::Ok().json(QuizResponse::from(outcome)))
}
