//! HTTP-level tests for the JwtAuth middleware
//!
//! A handler that records whether it ran is mounted behind the guard, so the
//! tests can assert that rejected requests never reach it.

use actix_middleware::{JwtAuth, MaybeUserId, UserId};
use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use crypto_core::jwt::JwtService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

const SECRET: &str = "middleware-integration-secret-0123456789";

#[derive(Default)]
struct Calls(AtomicUsize);

async fn whoami(user: UserId, calls: web::Data<Arc<Calls>>) -> HttpResponse {
    calls.0.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(serde_json::json!({ "id": user.0 }))
}

async fn maybe(user: MaybeUserId) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "id": user.0 }))
}

macro_rules! guarded_app {
    ($jwt:expr, $calls:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($jwt))
                .app_data(web::Data::new($calls))
                .service(
                    web::resource("/me")
                        .wrap(JwtAuth::required())
                        .route(web::get().to(whoami)),
                )
                .service(
                    web::resource("/maybe")
                        .wrap(JwtAuth::optional())
                        .route(web::get().to(maybe)),
                ),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_required_without_token_is_401_and_handler_skipped() {
    let jwt = JwtService::new(SECRET).unwrap();
    let calls = Arc::new(Calls::default());
    let app = guarded_app!(jwt, calls.clone());

    let req = test::TestRequest::get().uri("/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 401);
    assert_eq!(calls.0.load(Ordering::SeqCst), 0);
}

#[actix_rt::test]
async fn test_required_with_bad_token_is_401() {
    let jwt = JwtService::new(SECRET).unwrap();
    let calls = Arc::new(Calls::default());
    let app = guarded_app!(jwt, calls.clone());

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.0.load(Ordering::SeqCst), 0);
}

#[actix_rt::test]
async fn test_required_with_valid_token_reaches_handler() {
    let jwt = JwtService::new(SECRET).unwrap();
    let user = Uuid::new_v4();
    let token = jwt.issue(user).unwrap();
    let calls = Arc::new(Calls::default());
    let app = guarded_app!(jwt, calls.clone());

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.to_string());
    assert_eq!(calls.0.load(Ordering::SeqCst), 1);
}

#[actix_rt::test]
async fn test_optional_without_token_is_anonymous() {
    let jwt = JwtService::new(SECRET).unwrap();
    let app = guarded_app!(jwt, Arc::new(Calls::default()));

    let req = test::TestRequest::get().uri("/maybe").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["id"].is_null());
}

#[actix_rt::test]
async fn test_optional_with_raw_token_identifies_caller() {
    let jwt = JwtService::new(SECRET).unwrap();
    let user = Uuid::new_v4();
    let token = jwt.issue(user).unwrap();
    let app = guarded_app!(jwt, Arc::new(Calls::default()));

    let req = test::TestRequest::get()
        .uri("/maybe")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.to_string());
}

#[actix_rt::test]
async fn test_optional_with_invalid_token_is_anonymous() {
    let jwt = JwtService::new(SECRET).unwrap();
    let app = guarded_app!(jwt, Arc::new(Calls::default()));

    let req = test::TestRequest::get()
        .uri("/maybe")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["id"].is_null());
}

#[actix_rt::test]
async fn test_missing_jwt_service_is_500() {
    let app = test::init_service(
        App::new().service(
            web::resource("/me")
                .wrap(JwtAuth::required())
                .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
