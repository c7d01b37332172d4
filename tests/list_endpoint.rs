use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use relay_backend::config::{UploadersConfig, UpstreamConfig};
use relay_backend::features::relay::{
    RelayClient, StagingArea, UploaderRegistry, create_relay_router,
};
use relay_backend::state::AppState;

fn build_app(names: Vec<String>, staging_dir: &Path) -> Router {
    // list 接口不触达上游，端点随便给个不可达地址即可
    let upstream = UpstreamConfig {
        endpoint: "http://127.0.0.1:9/".to_string(),
        timeout_secs: 1,
    };
    let state = AppState {
        uploaders: Arc::new(UploaderRegistry::new(names)),
        relay: Arc::new(RelayClient::new(&upstream).expect("RelayClient::new")),
        staging: Arc::new(StagingArea::new(staging_dir.to_path_buf(), 1024)),
    };

    Router::<AppState>::new()
        .nest("/api", create_relay_router())
        .with_state(state)
}

async fn fetch_list(app: Router) -> (StatusCode, Option<String>, serde_json::Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/list")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call app");

    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let v = serde_json::from_slice(&bytes).expect("json body");
    (status, content_type, v)
}

/// 契约关键点：/list 返回配置顺序的名称数组，默认集合与上线前端的下拉选项一致。
#[tokio::test]
async fn list_returns_default_uploaders_in_configured_order() {
    let staging = tempfile::tempdir().expect("staging dir");
    let app = build_app(UploadersConfig::default().names, staging.path());

    let (status, content_type, v) = fetch_list(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        v,
        serde_json::json!([
            "anonfiles",
            "bayfiles",
            "file.io",
            "gofile",
            "katfile",
            "mixdrop",
            "pixeldrain",
            "racaty",
            "transfer.sh",
            "uguu.se",
            "uploadfile",
            "vshare",
            "zippyshare"
        ])
    );
}

#[tokio::test]
async fn list_reflects_configured_names_not_a_hardcoded_set() {
    let staging = tempfile::tempdir().expect("staging dir");
    let app = build_app(
        vec!["katfile".to_string(), "gofile".to_string()],
        staging.path(),
    );

    let (status, _, v) = fetch_list(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v, serde_json::json!(["katfile", "gofile"]));
}

#[tokio::test]
async fn list_is_stable_across_calls() {
    let staging = tempfile::tempdir().expect("staging dir");
    let app = build_app(UploadersConfig::default().names, staging.path());

    let (_, _, first) = fetch_list(app.clone()).await;
    let (_, _, second) = fetch_list(app).await;

    assert_eq!(first, second);
}
