mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;

use common::body_json;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_db_and_provider(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["ai_enabled"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_without_provider(pool: PgPool) {
    let app = common::build_app(pool, None);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["ai_enabled"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::token_for(uuid::Uuid::new_v4());

    let response = common::get(app, "/api/v1/does-not-exist", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
