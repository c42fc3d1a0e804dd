use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::{PlatformConfig, PlatformsConfig};
use crate::error::AppError;

use super::models::{
    self, Platform, RatingResult, atcoder_rating_color, codeforces_rank_color,
    topcoder_style_color,
};

/// 平台评级客户端：按平台分发到对应的上游 API 并做颜色映射。
///
/// 行为契约（三个平台一致）：上游传输失败、超时或业务非成功状态
/// 一律映射为 NotFound（对外 404），不重试、不静默兜底。
pub struct PlatformClient {
    http: Client,
    platforms: PlatformsConfig,
}

impl PlatformClient {
    pub fn new(platforms: &PlatformsConfig, timeout: Duration) -> Result<Self, AppError> {
        let http = crate::http::client_upstream(timeout)?.clone();
        Ok(Self {
            http,
            platforms: platforms.clone(),
        })
    }

    /// 对应平台的端点配置（徽章默认值也由此取得）
    pub fn platform_config(&self, platform: Platform) -> &PlatformConfig {
        self.platforms.get(platform)
    }

    /// 拉取 handle 的当前评级并映射为颜色。
    pub async fn get_rating_and_color(
        &self,
        platform: Platform,
        handle: &str,
    ) -> Result<RatingResult, AppError> {
        match platform {
            Platform::Codeforces => self.codeforces(handle).await,
            Platform::TopCoder => self.topcoder(handle).await,
            Platform::AtCoder => self.atcoder(handle).await,
        }
    }

    /// Codeforces：user.info API，`status != "OK"` 即视为未找到。
    async fn codeforces(&self, handle: &str) -> Result<RatingResult, AppError> {
        let cfg = self.platforms.get(Platform::Codeforces);
        let response = self
            .http
            .get(&cfg.api_url)
            .query(&[("handles", handle)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::NotFound(format!(
                "codeforces API 返回 {}",
                response.status()
            )));
        }

        let body: CodeforcesResponse = response
            .json()
            .await
            .map_err(|e| AppError::NotFound(format!("codeforces 响应解析失败: {e}")))?;

        if body.status != "OK" {
            return Err(AppError::NotFound(format!(
                "codeforces status = {}",
                body.status
            )));
        }

        let user = body
            .result
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("codeforces result 为空".to_string()))?;

        let color = user
            .rank
            .as_deref()
            .map(codeforces_rank_color)
            .unwrap_or(models::FALLBACK_COLOR);
        let rating = user
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| models::UNRATED.to_string());

        Ok(RatingResult {
            rating,
            color: color.to_string(),
        })
    }

    /// TopCoder：user details API，响应含 `error` 字段即视为未找到；
    /// 取 ratingSummary 中名为 "Algorithm" 的条目。
    async fn topcoder(&self, handle: &str) -> Result<RatingResult, AppError> {
        let cfg = self.platforms.get(Platform::TopCoder);
        let url = format!("{}/{}", cfg.api_url.trim_end_matches('/'), handle);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::NotFound(format!(
                "topcoder API 返回 {}",
                response.status()
            )));
        }

        let body: TopCoderResponse = response
            .json()
            .await
            .map_err(|e| AppError::NotFound(format!("topcoder 响应解析失败: {e}")))?;

        if body.error.is_some() {
            return Err(AppError::NotFound("topcoder 返回 error 字段".to_string()));
        }

        let Some(algorithm) = body
            .rating_summary
            .into_iter()
            .find(|s| s.name == "Algorithm")
        else {
            // 无 Algorithm 分项 → 存在但未评级
            return Ok(RatingResult::unrated());
        };

        Ok(RatingResult {
            rating: algorithm.rating.to_string(),
            color: topcoder_style_color(&algorithm.color_style),
        })
    }

    /// AtCoder：评级历史 API。历史为空时仍需探测用户主页确认
    /// handle 存在（探测失败按未找到处理，不做更强的一致性推断）。
    async fn atcoder(&self, handle: &str) -> Result<RatingResult, AppError> {
        let cfg = self.platforms.get(Platform::AtCoder);
        let profile_url = cfg.profile_url_for(handle);
        let history_url = format!("{profile_url}/history/json");

        let response = self.http.get(&history_url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::NotFound(format!(
                "atcoder API 返回 {}",
                response.status()
            )));
        }

        let history: Vec<AtCoderHistoryEntry> = response
            .json()
            .await
            .map_err(|e| AppError::NotFound(format!("atcoder 响应解析失败: {e}")))?;

        let Some(last) = history.last() else {
            // 历史为空：探测主页，确认 handle 存在
            let probe = self.http.get(&profile_url).send().await?;
            if !probe.status().is_success() {
                return Err(AppError::NotFound(format!(
                    "atcoder 主页返回 {}",
                    probe.status()
                )));
            }
            return Ok(RatingResult::unrated());
        };

        Ok(RatingResult {
            rating: last.new_rating.to_string(),
            color: atcoder_rating_color(last.new_rating).to_string(),
        })
    }
}

// =============== 上游响应模型 ===============

#[derive(Debug, Deserialize)]
struct CodeforcesResponse {
    status: String,
    #[serde(default)]
    result: Vec<CodeforcesUser>,
}

#[derive(Debug, Deserialize)]
struct CodeforcesUser {
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    rating: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TopCoderResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default, rename = "ratingSummary")]
    rating_summary: Vec<TopCoderRatingSummary>,
}

#[derive(Debug, Deserialize)]
struct TopCoderRatingSummary {
    name: String,
    rating: i64,
    #[serde(rename = "colorStyle")]
    color_style: String,
}

#[derive(Debug, Deserialize)]
struct AtCoderHistoryEntry {
    #[serde(rename = "NewRating")]
    new_rating: i64,
}
