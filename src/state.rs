use std::sync::Arc;

use crate::cache::RatingCache;
use crate::features::platform::PlatformClient;

/// 聚合的应用共享状态
///
/// 请求处理本身无状态；跨请求共享的只有评级缓存与上游客户端。
#[derive(Clone)]
pub struct AppState {
    pub platform_client: Arc<PlatformClient>,
    /// 评级缓存（TTL 记忆化，见 cache 模块）
    pub rating_cache: RatingCache,
}
