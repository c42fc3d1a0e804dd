use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::error::AppError;
use crate::features::platform::Platform;
use crate::state::AppState;

use super::models::{BadgeOverrides, BadgeSpec};
use super::renderer::render_badge;

/// 徽章响应禁止中间层缓存：新鲜度由服务端评级缓存保证，
/// 而不是 HTTP 缓存。
const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";

/// 单次请求的线性流水线：缓存/适配器 → 默认规格 → 覆盖 → 渲染。
async fn serve_badge(
    state: AppState,
    platform: Platform,
    raw_handle: String,
    overrides: BadgeOverrides,
) -> Result<Response, AppError> {
    // 路由按整段匹配，".svg" 作为 handle 段的后缀在这里剥离
    let handle = raw_handle
        .strip_suffix(".svg")
        .unwrap_or(&raw_handle)
        .to_string();
    if handle.is_empty() {
        return Err(AppError::NotFound("handle 为空".to_string()));
    }

    let client = state.platform_client.clone();
    let fetch_handle = handle.clone();
    let result = state
        .rating_cache
        .get_or_compute((platform, handle.clone()), async move {
            client.get_rating_and_color(platform, &fetch_handle).await
        })
        .await?;

    let mut spec = BadgeSpec::for_platform(
        platform,
        state.platform_client.platform_config(platform),
        &handle,
        &result,
    );
    spec.apply_overrides(overrides);

    let svg = render_badge(&spec)?;

    let mut response = svg.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("image/svg+xml"),
    );
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_VALUE),
    );
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/codeforces/{handle}",
    summary = "Codeforces 评级徽章",
    description = "按 handle 生成 Codeforces 评级 SVG 徽章。handle 可带 `.svg` 后缀。",
    params(
        ("handle" = String, Path, description = "Codeforces handle（可带 .svg 后缀）"),
        BadgeOverrides
    ),
    responses(
        (status = 200, description = "SVG 徽章", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "handle 不存在或上游不可用（空响应体）"),
        (status = 400, description = "覆盖参数不可渲染（空响应体）")
    ),
    tag = "Badge"
)]
pub async fn codeforces_badge(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(overrides): Query<BadgeOverrides>,
) -> Result<Response, AppError> {
    serve_badge(state, Platform::Codeforces, handle, overrides).await
}

#[utoipa::path(
    get,
    path = "/topcoder/{handle}",
    summary = "TopCoder 评级徽章",
    description = "按 handle 生成 TopCoder Algorithm 评级 SVG 徽章。handle 可带 `.svg` 后缀。",
    params(
        ("handle" = String, Path, description = "TopCoder handle（可带 .svg 后缀）"),
        BadgeOverrides
    ),
    responses(
        (status = 200, description = "SVG 徽章", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "handle 不存在或上游不可用（空响应体）"),
        (status = 400, description = "覆盖参数不可渲染（空响应体）")
    ),
    tag = "Badge"
)]
pub async fn topcoder_badge(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(overrides): Query<BadgeOverrides>,
) -> Result<Response, AppError> {
    serve_badge(state, Platform::TopCoder, handle, overrides).await
}

#[utoipa::path(
    get,
    path = "/atcoder/{handle}",
    summary = "AtCoder 评级徽章",
    description = "按 handle 生成 AtCoder 评级 SVG 徽章。handle 可带 `.svg` 后缀。",
    params(
        ("handle" = String, Path, description = "AtCoder handle（可带 .svg 后缀）"),
        BadgeOverrides
    ),
    responses(
        (status = 200, description = "SVG 徽章", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "handle 不存在或上游不可用（空响应体）"),
        (status = 400, description = "覆盖参数不可渲染（空响应体）")
    ),
    tag = "Badge"
)]
pub async fn atcoder_badge(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(overrides): Query<BadgeOverrides>,
) -> Result<Response, AppError> {
    serve_badge(state, Platform::AtCoder, handle, overrides).await
}

pub fn create_badge_router() -> Router<AppState> {
    Router::new()
        .route("/codeforces/:handle", get(codeforces_badge))
        .route("/topcoder/:handle", get(topcoder_badge))
        .route("/atcoder/:handle", get(atcoder_badge))
}
