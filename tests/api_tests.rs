mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::SecretString;
use serde_json::{json, Value};

use common::{trivia_categories, InMemoryCategoryRepository, InMemoryQuestionRepository};
use trivia_server::{
    app_state::AppState,
    auth::{scopes, AccessGuard, SharedSecretKeys, TokenClaims},
    config::Config,
    db::Database,
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
};

const SECRET: &str = "integration_secret_with_enough_length";

fn bearer(permissions: &[&str]) -> String {
    let claims = TokenClaims::new("auth0|quiz-master", Utc::now() + Duration::hours(1), permissions);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

async fn state() -> AppState {
    let config = Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "trivia-api-tests".to_string(),
        questions_collection: "questions".to_string(),
        categories_collection: "categories".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        auth0_domain: None,
        api_audience: None,
        jwt_secret: SecretString::from(SECRET.to_string()),
        jwks_cache_ttl_secs: 600,
        questions_per_page: 10,
        app_env: "test".to_string(),
    };

    let questions = InMemoryQuestionRepository::new();
    questions.seed(1, 4).await;
    questions.seed(2, 15).await;

    let guard = AccessGuard::new(Arc::new(SharedSecretKeys::new(&config.jwt_secret)), None, None);
    let db = Database::connect_lazy(&config).await.unwrap();

    AppState::from_parts(
        Arc::new(questions),
        Arc::new(InMemoryCategoryRepository::with(trivia_categories())),
        guard,
        db,
        config,
    )
}

#[actix_web::test]
async fn question_listing_paginates_with_stable_total() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state().await))
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/categories/2/questions?page=2")
        .insert_header(("Authorization", bearer(&[scopes::GET_QUESTIONS])))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["total_questions"], 15);
    assert_eq!(body["page"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["current_category"], "Art");

    let req = test::TestRequest::get()
        .uri("/questions?page=3&limit=8")
        .insert_header(("Authorization", bearer(&[scopes::GET_QUESTIONS])))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["total_questions"], 19);
    assert_eq!(body["categories"]["6"], "Sports");
}

#[actix_web::test]
async fn huge_page_number_is_an_empty_page() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state().await))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/questions?page=100000000000000000&limit=100")
        .insert_header(("Authorization", bearer(&[scopes::GET_QUESTIONS])))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["total_questions"], 19);
    assert_eq!(body["total_pages"], 1);
}

#[actix_web::test]
async fn create_then_delete_round_trip() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state().await))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/questions")
        .insert_header(("Authorization", bearer(&[scopes::POST_QUESTIONS])))
        .set_json(json!({
            "question": "Hematology is a branch of medicine involving the study of what?",
            "answer": "Blood",
            "difficulty": 4,
            "category": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["created"].as_i64().expect("created id");

    let req = test::TestRequest::post()
        .uri("/questions/search")
        .insert_header(("Authorization", bearer(&[scopes::GET_QUESTIONS])))
        .set_json(json!({ "searchTerm": "hematology" }))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["total_questions"], 1);
    assert_eq!(found["questions"][0]["id"], id);

    let delete_uri = format!("/questions/{}", id);
    let req = test::TestRequest::delete()
        .uri(&delete_uri)
        .insert_header(("Authorization", bearer(&[scopes::DELETE_QUESTIONS])))
        .to_request();
    let deleted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(deleted["deleted"], id);

    let req = test::TestRequest::delete()
        .uri(&delete_uri)
        .insert_header(("Authorization", bearer(&[scopes::DELETE_QUESTIONS])))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn scope_and_credential_failures_map_to_401_and_403() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state().await))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/categories").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/questions")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/categories")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/categories")
        .insert_header(("Authorization", bearer(&[scopes::GET_QUESTIONS])))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 403);
}

#[actix_web::test]
async fn quiz_over_all_categories_exhausts_after_every_question() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state().await))
            .configure(handlers::configure),
    )
    .await;

    let mut previous: Vec<i64> = Vec::new();
    loop {
        let req = test::TestRequest::post()
            .uri("/quizzes")
            .insert_header(("Authorization", bearer(&[scopes::PLAY_QUIZZES])))
            .set_json(json!({
                "previous_questions": previous,
                "quiz_category": { "id": 0, "type": "click" }
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        if body["exhausted"] == true {
            break;
        }

        let id = body["question"]["id"].as_i64().expect("question id");
        assert!(!previous.contains(&id));
        previous.push(id);
    }

    assert_eq!(previous.len(), 19);
}
