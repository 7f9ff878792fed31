use actix_web::{get, web, HttpRequest, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::{
    app_state::AppState,
    auth::scopes,
    errors::AppError,
    handlers::{bearer, parse_path, parse_query},
    models::{
        domain::QuestionFilter,
        dto::{
            request::PageParams,
            response::{CategoriesResponse, QuestionPageResponse},
        },
    },
};

#[get("/categories")]
pub async fn get_categories(
    state: web::Data<AppState>,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, AppError> {
    state
        .access_guard
        .authorize(bearer(&credentials), scopes::GET_CATEGORIES)
        .await?;

    let categories = state.category_service.labels().await?;
    Ok(HttpResponse::Ok().json(CategoriesResponse {
        success: true,
        categories,
    }))
}

#[get("/categories/{category_id}/questions")]
pub async fn get_category_questions(
    state: web::Data<AppState>,
    req: HttpRequest,
    credentials: Option<BearerAuth>,
) -> Result<HttpResponse, AppError> {
    state
        .access_guard
        .authorize(bearer(&credentials), scopes::GET_QUESTIONS)
        .await?;

    let category_id: i64 = parse_path(&req, "category_id")?;
    let page = parse_query::<PageParams>(&req)?
        .to_page_request(state.config.questions_per_page)?;

    let questions = state
        .question_service
        .list(&QuestionFilter::in_category(category_id), page)
        .await?;
    let current_category = state.category_service.label_of(category_id).await?;

    Ok(HttpResponse::Ok().json(
        QuestionPageResponse::from_page(questions, page).with_current_category(current_category),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Category, Question},
        repositories::{MockCategoryRepository, MockQuestionRepository},
        test_utils::{bearer_token, test_state},
    };
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_categories_require_credential() {
        let state = test_state(MockQuestionRepository::new(), MockCategoryRepository::new()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(get_categories),
        )
        .await;

        let req = test::TestRequest::get().uri("/categories").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_categories_listed_by_id() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_all()
            .returning(|| Ok(vec![Category::new(1, "Science"), Category::new(2, "Art")]));

        let state = test_state(MockQuestionRepository::new(), categories).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(get_categories),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/categories")
            .insert_header(("Authorization", bearer_token(&[scopes::GET_CATEGORIES])))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["categories"]["1"], "Science");
        assert_eq!(body["categories"]["2"], "Art");
    }

    #[actix_web::test]
    async fn test_category_questions_carry_current_category() {
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_find_page()
            .withf(|filter, offset, limit| {
                filter.category_id == Some(3) && *offset == 0 && *limit == 10
            })
            .returning(|_, _, _| {
                Ok((
                    vec![Question {
                        id: 13,
                        text: "What is the largest lake in Africa?".to_string(),
                        answer: "Lake Victoria".to_string(),
                        difficulty: 2,
                        category_id: 3,
                    }],
                    1,
                ))
            });

        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(|id| Ok(Some(Category::new(id, "Geography"))));

        let state = test_state(questions, categories).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(get_category_questions),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/categories/3/questions")
            .insert_header(("Authorization", bearer_token(&[scopes::GET_QUESTIONS])))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_questions"], 1);
        assert_eq!(body["current_category"], "Geography");
        assert_eq!(body["questions"][0]["category"], 3);
    }
}
