use axum::{
    Router,
    body::Body,
    http::{Request, header},
    routing::get,
};
use tower::ServiceExt;

use relay_backend::config::CorsConfig;
use relay_backend::cors::build_cors_layer;

fn app_with_cors(cors: &CorsConfig) -> Router {
    let layer = build_cors_layer(cors).expect("cors layer");
    Router::new()
        .route("/", get(|| async { "ok" }))
        .layer(layer)
}

#[tokio::test]
async fn cors_layer_echoes_allowed_origin() {
    let cors = CorsConfig {
        enabled: true,
        allowed_origins: vec!["https://relay.example.com".to_string()],
    };
    let app = app_with_cors(&cors);

    let req = Request::builder()
        .method("GET")
        .uri("/")
        .header(header::ORIGIN, "https://relay.example.com")
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("call app");

    let allow_origin = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("missing allow origin")
        .to_str()
        .expect("invalid allow origin");
    assert_eq!(allow_origin, "https://relay.example.com");
}

#[tokio::test]
async fn cors_wildcard_allows_any_origin() {
    // 默认配置即 allowed_origins = ["*"]
    let app = app_with_cors(&CorsConfig::default());

    let req = Request::builder()
        .method("GET")
        .uri("/")
        .header(header::ORIGIN, "https://some-frontend.example")
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("call app");

    let allow_origin = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("missing allow origin")
        .to_str()
        .expect("invalid allow origin");
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn cors_preflight_allows_any_method() {
    let cors = CorsConfig {
        enabled: true,
        allowed_origins: vec!["https://relay.example.com".to_string()],
    };
    let app = app_with_cors(&cors);

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/")
        .header(header::ORIGIN, "https://relay.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("call app");

    // 匿名公开接口，方法一律放开
    let allow_methods = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .expect("missing allow methods")
        .to_str()
        .expect("invalid allow methods");
    assert_eq!(allow_methods, "*");
}
