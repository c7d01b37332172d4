use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use relay_backend::config::AppConfig;
use relay_backend::cors::build_cors_layer;
use relay_backend::features::health::handler::health_check;
use relay_backend::features::relay::{self, RelayClient, StagingArea, UploaderRegistry};
use relay_backend::openapi::ApiDoc;
use relay_backend::shutdown::shutdown_signal;
use relay_backend::startup::run_startup_checks;
use relay_backend::state::AppState;
use tower_http::services::{ServeDir, ServeFile};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// multipart 框架开销余量。`DefaultBodyLimit` 管的是整个请求体，
/// 文件内容的精确上限在暂存写入阶段执行。
const BODY_LIMIT_SLACK_BYTES: u64 = 64 * 1024;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_backend=info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Config init failed: {}", e);
            std::process::exit(1);
        }
    };

    // Run startup checks
    if let Err(e) = run_startup_checks(&config).await {
        tracing::error!("Startup checks failed: {}", e);
        std::process::exit(1);
    }

    // Shared state
    let relay_client = match RelayClient::new(&config.upstream) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Relay client init failed: {}", e);
            std::process::exit(1);
        }
    };
    let app_state = AppState {
        uploaders: Arc::new(UploaderRegistry::new(config.uploaders.names.clone())),
        relay: relay_client,
        staging: Arc::new(StagingArea::new(
            config.staging_path(),
            config.staging.max_upload_bytes,
        )),
    };

    // Routes
    let body_limit = usize::try_from(config.staging.max_upload_bytes + BODY_LIMIT_SLACK_BYTES)
        .unwrap_or(usize::MAX);
    let api_router = relay::create_relay_router().layer(DefaultBodyLimit::max(body_limit));

    let static_root = config.static_assets_path();
    let static_site =
        ServeDir::new(&static_root).not_found_service(ServeFile::new(static_root.join("index.html")));

    let mut app = Router::<AppState>::new()
        .route("/health", get(health_check))
        .nest(&config.api.prefix, api_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // 未匹配路由回退到前端静态资源；不存在的路径返回 index.html（SPA 入口）。
        .fallback_service(static_site)
        .with_state(app_state);

    if let Some(cors) = build_cors_layer(&config.cors) {
        app = app.layer(cors);
    }

    // 信号注册放在 bind 之前，失败直接退出而不是运行期悄悄失效
    let shutdown = match shutdown_signal() {
        Ok(fut) => fut,
        Err(e) => {
            tracing::error!("信号处理器启动失败: {}", e);
            std::process::exit(1);
        }
    };

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("List API: http://{}{}/list", addr, config.api.prefix);
    tracing::info!("Upload API: http://{}{}/upload", addr, config.api.prefix);
    tracing::info!("Upstream: {}", config.upstream.endpoint);
    tracing::info!("Static assets: {:?}", config.static_assets_path());

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("服务已退出");
}
