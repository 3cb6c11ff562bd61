//! Request handling that never reaches the database
//!
//! Guarded routes, body and path parsing, and CORS are all decided before
//! any SQL runs, so these tests use a pool that points nowhere.

mod common;

use actix_web::http::{header, Method, StatusCode};
use actix_web::{test, web, App};
use blog_service::routes;
use uuid::Uuid;

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(common::unreachable_pool()))
                .app_data(web::Data::new(common::jwt_service()))
                .wrap(routes::cors(&[common::TEST_ORIGIN.to_string()]))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let app = init_app!();
    let post = Uuid::new_v4();

    let protected = [
        (Method::GET, "/api/v1/user/details".to_string()),
        (Method::PUT, "/api/v1/user/update-user-info".to_string()),
        (Method::PUT, "/api/v1/user/update-profile-picture".to_string()),
        (Method::PUT, "/api/v1/user/update-cover-picture".to_string()),
        (Method::GET, "/api/v1/user/savedblogs".to_string()),
        (Method::GET, "/api/v1/user/user-stats".to_string()),
        (Method::POST, "/api/v1/blog".to_string()),
        (Method::POST, "/api/v1/blog/saveblog".to_string()),
        (Method::PUT, format!("/api/v1/blog/editedblog/{}", post)),
        (Method::DELETE, format!("/api/v1/blog/deleteblog/{}", post)),
        (Method::GET, format!("/api/v1/blog/likestatus/{}", post)),
        (Method::DELETE, format!("/api/v1/blog/removesavedblog/{}", post)),
        (Method::POST, format!("/api/v1/blog/{}/like", post)),
        (Method::DELETE, format!("/api/v1/blog/{}/likeremove", post)),
        (Method::POST, format!("/api/v1/blog/{}/comment", post)),
        (Method::GET, format!("/api/v1/blog/{}/comments", post)),
    ];

    for (method, uri) in protected {
        let req = test::TestRequest::default()
            .method(method.clone())
            .uri(&uri)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should need a token",
            method,
            uri
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 401);
    }
}

#[actix_web::test]
async fn tampered_token_is_rejected() {
    let app = init_app!();
    let mut token = common::token_for(Uuid::new_v4());
    token.push('x');

    let req = test::TestRequest::get()
        .uri("/api/v1/user/details")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/user/signup")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn invalid_signup_is_rejected_before_storage() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/user/signup")
        .set_json(serde_json::json!({ "email": "not-an-email", "password": "123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Input not correct");
    assert_eq!(body["errors"][0]["field"], "email");
    assert_eq!(body["errors"][1]["field"], "password");
}

#[actix_web::test]
async fn invalid_post_bodies_are_rejected() {
    let app = init_app!();
    let token = common::token_for(Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri("/api/v1/blog")
        .insert_header(common::bearer(&token))
        .set_json(serde_json::json!({ "title": "  ", "content": "Body" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/blog/editedblog/{}", Uuid::new_v4()))
        .insert_header(common::bearer(&token))
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn non_uuid_path_is_a_bad_request() {
    let app = init_app!();
    let token = common::token_for(Uuid::new_v4());

    let req = test::TestRequest::get()
        .uri("/api/v1/blog/likestatus/not-a-uuid")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Public route, no token
    let req = test::TestRequest::get()
        .uri("/api/v1/blog/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn health_reports_unreachable_database() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
}

#[actix_web::test]
async fn preflight_allows_configured_origin() {
    let app = init_app!();

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/v1/blog/bulk")
        .insert_header((header::ORIGIN, common::TEST_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        common::TEST_ORIGIN
    );
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[actix_web::test]
async fn preflight_ignores_unknown_origin() {
    let app = init_app!();

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/v1/blog/bulk")
        .insert_header((header::ORIGIN, "https://evil.example.com"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
