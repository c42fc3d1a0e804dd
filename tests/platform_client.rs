use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::json;

use cp_badges::config::{PlatformConfig, PlatformsConfig};
use cp_badges::error::AppError;
use cp_badges::features::platform::{Platform, PlatformClient};

/// 在随机端口上启动一个桩上游，返回 base url。
async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    format!("http://{addr}")
}

fn platforms_for(base: &str) -> PlatformsConfig {
    let mut platforms = PlatformsConfig::default();
    platforms.codeforces = PlatformConfig {
        api_url: format!("{base}/api/user.info"),
        base_url: base.to_string(),
        profile_url: format!("{base}/profile/{{handle}}"),
        logo: None,
    };
    platforms.topcoder = PlatformConfig {
        api_url: format!("{base}/v2/users"),
        base_url: base.to_string(),
        profile_url: format!("{base}/members/{{handle}}"),
        logo: None,
    };
    platforms.atcoder = PlatformConfig {
        api_url: base.to_string(),
        base_url: base.to_string(),
        profile_url: format!("{base}/users/{{handle}}"),
        logo: None,
    };
    platforms
}

async fn client_for(base: &str) -> PlatformClient {
    PlatformClient::new(&platforms_for(base), Duration::from_secs(8)).expect("build client")
}

#[tokio::test]
async fn codeforces_maps_rank_and_rating() {
    let base = spawn_upstream(Router::new().route(
        "/api/user.info",
        get(|| async {
            Json(json!({
                "status": "OK",
                "result": [{"rank": "expert", "rating": 1750}]
            }))
        }),
    ))
    .await;

    let got = client_for(&base)
        .await
        .get_rating_and_color(Platform::Codeforces, "somebody")
        .await
        .expect("rating result");
    assert_eq!(got.rating, "1750");
    assert_eq!(got.color, "#0000FF");
}

#[tokio::test]
async fn codeforces_missing_rating_is_unrated_black() {
    let base = spawn_upstream(Router::new().route(
        "/api/user.info",
        get(|| async { Json(json!({"status": "OK", "result": [{}]})) }),
    ))
    .await;

    let got = client_for(&base)
        .await
        .get_rating_and_color(Platform::Codeforces, "fresh")
        .await
        .expect("rating result");
    assert_eq!(got.rating, "unrated");
    assert_eq!(got.color, "black");
}

#[tokio::test]
async fn codeforces_failed_status_is_not_found() {
    let base = spawn_upstream(Router::new().route(
        "/api/user.info",
        get(|| async { Json(json!({"status": "FAILED", "comment": "handles: User not found"})) }),
    ))
    .await;

    let err = client_for(&base)
        .await
        .get_rating_and_color(Platform::Codeforces, "nobody")
        .await
        .expect_err("expected not found");
    assert!(matches!(err, AppError::NotFound(_)), "got: {err:?}");
}

#[tokio::test]
async fn topcoder_picks_algorithm_entry() {
    let base = spawn_upstream(Router::new().route(
        "/v2/users/:handle",
        get(|| async {
            Json(json!({
                "handle": "somebody",
                "ratingSummary": [
                    {"name": "Marathon Match", "rating": 1200, "colorStyle": "color: #00A900"},
                    {"name": "Algorithm", "rating": 2145, "colorStyle": "color: #DDCC00"}
                ]
            }))
        }),
    ))
    .await;

    let got = client_for(&base)
        .await
        .get_rating_and_color(Platform::TopCoder, "somebody")
        .await
        .expect("rating result");
    assert_eq!(got.rating, "2145");
    assert_eq!(got.color, "#DDCC00");
}

#[tokio::test]
async fn topcoder_without_algorithm_is_unrated_black() {
    let base = spawn_upstream(Router::new().route(
        "/v2/users/:handle",
        get(|| async {
            Json(json!({
                "handle": "somebody",
                "ratingSummary": [
                    {"name": "Marathon Match", "rating": 1200, "colorStyle": "color: #00A900"}
                ]
            }))
        }),
    ))
    .await;

    let got = client_for(&base)
        .await
        .get_rating_and_color(Platform::TopCoder, "somebody")
        .await
        .expect("rating result");
    assert_eq!(got.rating, "unrated");
    assert_eq!(got.color, "black");
}

#[tokio::test]
async fn topcoder_error_field_is_not_found() {
    let base = spawn_upstream(Router::new().route(
        "/v2/users/:handle",
        get(|| async {
            Json(json!({"error": {"name": "Not Found", "value": 404}}))
        }),
    ))
    .await;

    let err = client_for(&base)
        .await
        .get_rating_and_color(Platform::TopCoder, "nobody")
        .await
        .expect_err("expected not found");
    assert!(matches!(err, AppError::NotFound(_)), "got: {err:?}");
}

#[tokio::test]
async fn atcoder_uses_last_history_entry() {
    let base = spawn_upstream(Router::new().route(
        "/users/:handle/history/json",
        get(|| async {
            Json(json!([
                {"NewRating": 400, "Place": 200},
                {"NewRating": 2801, "Place": 3}
            ]))
        }),
    ))
    .await;

    let got = client_for(&base)
        .await
        .get_rating_and_color(Platform::AtCoder, "somebody")
        .await
        .expect("rating result");
    assert_eq!(got.rating, "2801");
    assert_eq!(got.color, "#FF0000");
}

#[tokio::test]
async fn atcoder_empty_history_with_live_profile_is_unrated() {
    let base = spawn_upstream(
        Router::new()
            .route("/users/:handle/history/json", get(|| async { Json(json!([])) }))
            .route("/users/:handle", get(|| async { "<html>profile</html>" })),
    )
    .await;

    let got = client_for(&base)
        .await
        .get_rating_and_color(Platform::AtCoder, "fresh")
        .await
        .expect("rating result");
    assert_eq!(got.rating, "unrated");
    assert_eq!(got.color, "black");
}

#[tokio::test]
async fn atcoder_empty_history_with_dead_profile_is_not_found() {
    let base = spawn_upstream(
        Router::new()
            .route("/users/:handle/history/json", get(|| async { Json(json!([])) }))
            .route(
                "/users/:handle",
                get(|| async { StatusCode::NOT_FOUND }),
            ),
    )
    .await;

    let err = client_for(&base)
        .await
        .get_rating_and_color(Platform::AtCoder, "nobody")
        .await
        .expect_err("expected not found");
    assert!(matches!(err, AppError::NotFound(_)), "got: {err:?}");
}

#[tokio::test]
async fn upstream_http_error_is_not_found() {
    let base = spawn_upstream(Router::new().route(
        "/api/user.info",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let err = client_for(&base)
        .await
        .get_rating_and_color(Platform::Codeforces, "anyone")
        .await
        .expect_err("expected not found");
    assert!(matches!(err, AppError::NotFound(_)), "got: {err:?}");
}
