use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use cp_badges::cache::RatingCache;
use cp_badges::config::AppConfig;
use cp_badges::features::badge;
use cp_badges::features::health::health_check;
use cp_badges::features::platform::PlatformClient;
use cp_badges::state::AppState;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn compression_predicate() -> impl tower_http::compression::predicate::Predicate {
    use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};

    // 压缩策略：明确排除不该压缩的响应。
    //
    // - 位图（png/jpg 等）：本身已压缩，排除；SVG 是文本，仍压缩
    //   （NotForContentType::IMAGES 对 image/svg+xml 放行）。
    // - 保留默认最小大小阈值（32B），避免压缩开销覆盖收益。
    SizeAbove::default()
        .and(NotForContentType::GRPC)
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::SSE)
}


#[derive(OpenApi)]
#[openapi(
    paths(
        cp_badges::features::badge::handler::codeforces_badge,
        cp_badges::features::badge::handler::topcoder_badge,
        cp_badges::features::badge::handler::atcoder_badge,
        cp_badges::features::health::handler::health_check,
    ),
    components(schemas(
        cp_badges::AppError,
        cp_badges::features::platform::Platform,
        cp_badges::features::health::handler::HealthResponse,
    )),
    tags(
        (name = "Badge", description = "Rating badge APIs"),
        (name = "Health", description = "Health APIs"),
    ),
    info(
        title = "CP Badges API",
        version = "0.1.0",
        description = "Competitive-programming rating badge service (Axum)"
    )
)]
pub struct ApiDoc;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("安装 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("安装 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("接收到退出信号，开始优雅关闭...");
}

#[tokio::main]
async fn main() {
    // Load config
    if let Err(e) = AppConfig::init_global() {
        eprintln!("Config init failed: {e}");
        std::process::exit(1);
    }
    let config = AppConfig::global();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    // Shared state
    let upstream_timeout = Duration::from_secs(config.upstream.timeout_secs);
    let platform_client = match PlatformClient::new(&config.platforms, upstream_timeout) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("上游客户端初始化失败: {}", e);
            std::process::exit(1);
        }
    };
    let app_state = AppState {
        platform_client,
        rating_cache: RatingCache::new(config.cache_ttl()),
    };

    // Routes
    let mut app = Router::<AppState>::new()
        .route("/health", get(health_check))
        .merge(badge::create_badge_router())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // 徽章多被跨域 fetch/嵌入，放开 CORS；SVG/JSON 响应启用压缩。
    app = app.layer(CorsLayer::permissive());
    app = app.layer(CompressionLayer::new().compress_when(compression_predicate()));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Badge: http://{}/codeforces/{{handle}}.svg", addr);
    tracing::info!("Cache TTL: {}s", config.cache.ttl_secs);

    let graceful = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {}", e);
        std::process::exit(1);
    }

    tracing::info!("服务器已优雅关闭");
}
