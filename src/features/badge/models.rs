use serde::Deserialize;

use crate::config::PlatformConfig;
use crate::features::platform::{Platform, RatingResult};

/// 徽章渲染规格：左右两段 shield 徽章的全部可变字段。
///
/// 默认值来自平台静态元数据与评级结果；每个字段都可被
/// 同名 query 参数逐字覆盖（见 [`BadgeOverrides`]）。
#[derive(Debug, Clone)]
pub struct BadgeSpec {
    /// 左段文本（默认平台显示名）
    pub left_text: String,
    /// 右段文本（默认评级值或 "unrated"）
    pub right_text: String,
    /// 左段跳转链接（默认平台主页）
    pub left_link: Option<String>,
    /// 右段跳转链接（默认用户主页）
    pub right_link: Option<String>,
    /// 整体跳转链接（设置后取代左右分段链接）
    pub whole_link: Option<String>,
    /// 左段内嵌 logo（data URI 或外链）
    pub logo: Option<String>,
    /// 左段背景色
    pub left_color: String,
    /// 右段背景色（默认评级分段颜色）
    pub right_color: String,
    /// 整体 title（悬浮提示）
    pub whole_title: Option<String>,
    /// 左段 title
    pub left_title: Option<String>,
    /// 右段 title
    pub right_title: Option<String>,
    /// SVG 内部 id 后缀（同页多徽章时避免 id 冲突）
    pub id_suffix: String,
}

/// 左段默认背景色（shields 风格深灰）
pub const DEFAULT_LEFT_COLOR: &str = "#555";

impl BadgeSpec {
    /// 由平台元数据 + 评级结果构造默认规格。
    pub fn for_platform(
        platform: Platform,
        cfg: &PlatformConfig,
        handle: &str,
        result: &RatingResult,
    ) -> Self {
        Self {
            left_text: platform.label().to_string(),
            right_text: result.rating.clone(),
            left_link: Some(cfg.base_url.clone()),
            right_link: Some(cfg.profile_url_for(handle)),
            whole_link: None,
            logo: cfg.logo.clone(),
            left_color: DEFAULT_LEFT_COLOR.to_string(),
            right_color: result.color.clone(),
            whole_title: None,
            left_title: None,
            right_title: None,
            id_suffix: String::new(),
        }
    }

    /// 应用调用方覆盖：字段对字段、逐字生效，未识别参数在
    /// Query 反序列化阶段即被忽略。
    pub fn apply_overrides(&mut self, ov: BadgeOverrides) {
        if let Some(v) = ov.left_text {
            self.left_text = v;
        }
        if let Some(v) = ov.right_text {
            self.right_text = v;
        }
        if let Some(v) = ov.left_link {
            self.left_link = Some(v);
        }
        if let Some(v) = ov.right_link {
            self.right_link = Some(v);
        }
        if let Some(v) = ov.whole_link {
            self.whole_link = Some(v);
        }
        if let Some(v) = ov.logo {
            self.logo = Some(v);
        }
        if let Some(v) = ov.left_color {
            self.left_color = v;
        }
        if let Some(v) = ov.right_color {
            self.right_color = v;
        }
        if let Some(v) = ov.whole_title {
            self.whole_title = Some(v);
        }
        if let Some(v) = ov.left_title {
            self.left_title = Some(v);
        }
        if let Some(v) = ov.right_title {
            self.right_title = Some(v);
        }
        if let Some(v) = ov.id_suffix {
            self.id_suffix = v;
        }
    }
}

/// 调用方可用的 query 覆盖参数（固定字段集合，未识别参数忽略）。
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BadgeOverrides {
    /// 覆盖左段文本
    pub left_text: Option<String>,
    /// 覆盖右段文本
    pub right_text: Option<String>,
    /// 覆盖左段链接
    pub left_link: Option<String>,
    /// 覆盖右段链接
    pub right_link: Option<String>,
    /// 覆盖整体链接
    pub whole_link: Option<String>,
    /// 覆盖 logo
    pub logo: Option<String>,
    /// 覆盖左段背景色
    pub left_color: Option<String>,
    /// 覆盖右段背景色
    pub right_color: Option<String>,
    /// 覆盖整体 title
    pub whole_title: Option<String>,
    /// 覆盖左段 title
    pub left_title: Option<String>,
    /// 覆盖右段 title
    pub right_title: Option<String>,
    /// 覆盖 SVG id 后缀
    pub id_suffix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformsConfig;

    fn default_spec() -> BadgeSpec {
        let platforms = PlatformsConfig::default();
        BadgeSpec::for_platform(
            Platform::Codeforces,
            platforms.get(Platform::Codeforces),
            "tourist",
            &RatingResult {
                rating: "3858".to_string(),
                color: "#FF0000".to_string(),
            },
        )
    }

    #[test]
    fn defaults_come_from_platform_metadata() {
        let spec = default_spec();
        assert_eq!(spec.left_text, "Codeforces");
        assert_eq!(spec.right_text, "3858");
        assert_eq!(spec.left_color, "#555");
        assert_eq!(spec.right_color, "#FF0000");
        assert_eq!(
            spec.right_link.as_deref(),
            Some("https://codeforces.com/profile/tourist")
        );
        assert_eq!(spec.left_link.as_deref(), Some("https://codeforces.com"));
    }

    #[test]
    fn overrides_apply_field_for_field() {
        let mut spec = default_spec();
        spec.apply_overrides(BadgeOverrides {
            right_color: Some("#123456".to_string()),
            whole_link: Some("https://example.com".to_string()),
            ..BadgeOverrides::default()
        });
        assert_eq!(spec.right_color, "#123456");
        assert_eq!(spec.whole_link.as_deref(), Some("https://example.com"));
        // 未覆盖字段保持默认
        assert_eq!(spec.left_text, "Codeforces");
        assert_eq!(spec.right_text, "3858");
    }
}
