use std::future::Future;
use std::time::Duration;

use moka::future::Cache;

use crate::error::AppError;
use crate::features::platform::{Platform, RatingResult};

/// 缓存键：(platform, handle)。不同键之间互不共享条目。
pub type RatingKey = (Platform, String);

/// 评级结果缓存
///
/// 对适配器的 `get_rating_and_color` 做短 TTL 记忆化，减少上游压力：
/// - TTL 内命中直接返回，不发起网络请求；
/// - 过期或未命中时执行 compute 并写入；
/// - 失败结果不缓存（下次访问重新请求上游）；
/// - 同一 key 并发未命中时 moka 会合并 in-flight 请求（按 key 去重）。
///
/// 进程内缓存，无持久化；条目数不设上限，靠 TTL 自限。
#[derive(Clone)]
pub struct RatingCache {
    inner: Cache<RatingKey, RatingResult>,
}

impl RatingCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder().time_to_live(ttl).build();
        Self { inner }
    }

    /// TTL 内命中直接返回缓存值；否则执行 `compute` 并缓存成功结果。
    pub async fn get_or_compute<F>(
        &self,
        key: RatingKey,
        compute: F,
    ) -> Result<RatingResult, AppError>
    where
        F: Future<Output = Result<RatingResult, AppError>>,
    {
        self.inner
            .try_get_with(key, compute)
            .await
            .map_err(|e| e.as_ref().clone())
    }

    /// 当前缓存条目数（测试/诊断用）
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
