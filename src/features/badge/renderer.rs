use std::sync::OnceLock;

use minijinja::Environment;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::error::AppError;

use super::models::BadgeSpec;

/// 两段式 shield 徽章的 SVG 渲染。
///
/// 设计原则（与外部模板渲染约定一致）：
/// - Rust 负责：参数校验、宽度估算、XML 转义；
/// - 模板负责：SVG 结构与元素排列；
/// - 模板内编译期内嵌，不依赖运行时文件。
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const BADGE_TEMPLATE: &str = include_str!("badge.svg.jinja");
const TEMPLATE_NAME: &str = "badge.svg";

/// 近似字宽：Verdana 11px 下每个显示宽度单位约 7px
const CHAR_WIDTH_PX: u32 = 7;
/// 段内左右内边距
const SEGMENT_PADDING_PX: u32 = 10;
/// logo 占位（14px 图标 + 3px 间距）
const LOGO_SLOT_PX: u32 = 17;

fn get_template_env() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, BADGE_TEMPLATE)
            .expect("内嵌徽章模板必须合法");
        env
    })
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// 颜色 token 校验：`#RGB` / `#RRGGBB` 十六进制，或纯字母命名色。
fn is_valid_color(token: &str) -> bool {
    if let Some(hex) = token.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic())
}

/// id_suffix 校验：仅允许安全字符，避免拼出畸形 id/url(#...) 引用。
fn is_valid_id_suffix(suffix: &str) -> bool {
    suffix.len() <= 64
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn text_width_px(text: &str) -> u32 {
    (text.width() as u32) * CHAR_WIDTH_PX
}

#[derive(Debug, Serialize)]
struct BadgeCtx {
    width: u32,
    left_width: u32,
    right_width: u32,
    left_text_x: u32,
    right_text_x: u32,
    left_color: String,
    right_color: String,
    id_suffix: String,
    aria_label_xml: String,
    left_text_xml: String,
    right_text_xml: String,
    left_link_xml: Option<String>,
    right_link_xml: Option<String>,
    whole_link_xml: Option<String>,
    logo_xml: Option<String>,
    whole_title_xml: Option<String>,
    left_title_xml: Option<String>,
    right_title_xml: Option<String>,
}

/// 渲染徽章 SVG。覆盖值不可渲染（非法颜色 / 非法 id_suffix）时
/// 返回校验错误（对外 400）。
pub fn render_badge(spec: &BadgeSpec) -> Result<String, AppError> {
    for (field, value) in [
        ("left_color", &spec.left_color),
        ("right_color", &spec.right_color),
    ] {
        if !is_valid_color(value) {
            return Err(AppError::Validation(format!("非法颜色 {field}={value}")));
        }
    }
    if !is_valid_id_suffix(&spec.id_suffix) {
        return Err(AppError::Validation(format!(
            "非法 id_suffix: {}",
            spec.id_suffix
        )));
    }

    let logo_slot = if spec.logo.is_some() { LOGO_SLOT_PX } else { 0 };
    let left_width = SEGMENT_PADDING_PX + logo_slot + text_width_px(&spec.left_text);
    let right_width = SEGMENT_PADDING_PX + text_width_px(&spec.right_text);
    let width = left_width + right_width;

    // 文本在各自段内居中；左段需让出 logo 占位
    let left_text_x = logo_slot + (left_width - logo_slot) / 2;
    let right_text_x = left_width + right_width / 2;

    let ctx = BadgeCtx {
        width,
        left_width,
        right_width,
        left_text_x,
        right_text_x,
        left_color: spec.left_color.clone(),
        right_color: spec.right_color.clone(),
        id_suffix: spec.id_suffix.clone(),
        aria_label_xml: escape_xml(&format!("{}: {}", spec.left_text, spec.right_text)),
        left_text_xml: escape_xml(&spec.left_text),
        right_text_xml: escape_xml(&spec.right_text),
        left_link_xml: spec.left_link.as_deref().map(escape_xml),
        right_link_xml: spec.right_link.as_deref().map(escape_xml),
        whole_link_xml: spec.whole_link.as_deref().map(escape_xml),
        logo_xml: spec.logo.as_deref().map(escape_xml),
        whole_title_xml: spec.whole_title.as_deref().map(escape_xml),
        left_title_xml: spec.left_title.as_deref().map(escape_xml),
        right_title_xml: spec.right_title.as_deref().map(escape_xml),
    };

    let env = get_template_env();
    let tpl = env
        .get_template(TEMPLATE_NAME)
        .map_err(|e| AppError::Internal(format!("加载徽章模板失败: {e}")))?;
    tpl.render(&ctx)
        .map_err(|e| AppError::Internal(format!("渲染徽章模板失败: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformsConfig;
    use crate::features::platform::{Platform, RatingResult};

    fn spec() -> BadgeSpec {
        let platforms = PlatformsConfig::default();
        BadgeSpec::for_platform(
            Platform::AtCoder,
            platforms.get(Platform::AtCoder),
            "chokudai",
            &RatingResult {
                rating: "3096".to_string(),
                color: "#FF0000".to_string(),
            },
        )
    }

    #[test]
    fn renders_label_rating_and_colors() {
        let svg = render_badge(&spec()).expect("render");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">AtCoder<"));
        assert!(svg.contains(">3096<"));
        assert!(svg.contains(r##"fill="#FF0000""##));
        assert!(svg.contains(r##"fill="#555""##));
        assert!(svg.contains("https://atcoder.jp/users/chokudai"));
    }

    #[test]
    fn unrated_renders_literal_text() {
        let mut s = spec();
        s.right_text = "unrated".to_string();
        s.right_color = "black".to_string();
        let svg = render_badge(&s).expect("render");
        assert!(svg.contains(">unrated<"));
        assert!(svg.contains(r#"fill="black""#));
    }

    #[test]
    fn override_color_reaches_svg() {
        let mut s = spec();
        s.right_color = "#123456".to_string();
        let svg = render_badge(&s).expect("render");
        assert!(svg.contains(r##"fill="#123456""##));
        assert!(!svg.contains("#FF0000"));
    }

    #[test]
    fn malformed_color_is_rejected() {
        let mut s = spec();
        s.right_color = "#12345".to_string();
        assert!(matches!(
            render_badge(&s),
            Err(AppError::Validation(_))
        ));

        let mut s = spec();
        s.left_color = "url(#evil)".to_string();
        assert!(matches!(render_badge(&s), Err(AppError::Validation(_))));
    }

    #[test]
    fn malformed_id_suffix_is_rejected() {
        let mut s = spec();
        s.id_suffix = "a)\"><script".to_string();
        assert!(matches!(render_badge(&s), Err(AppError::Validation(_))));
    }

    #[test]
    fn id_suffix_lands_in_gradient_and_clip_ids() {
        let mut s = spec();
        s.id_suffix = "-2".to_string();
        let svg = render_badge(&s).expect("render");
        assert!(svg.contains(r#"id="smooth-2""#));
        assert!(svg.contains(r#"id="round-2""#));
        assert!(svg.contains("url(#round-2)"));
    }

    #[test]
    fn text_is_xml_escaped() {
        let mut s = spec();
        s.left_text = r#"a<b>&"c""#.to_string();
        let svg = render_badge(&s).expect("render");
        assert!(svg.contains("a&lt;b&gt;&amp;&quot;c&quot;"));
        assert!(!svg.contains("a<b>"));
    }

    #[test]
    fn whole_link_wraps_instead_of_segment_links() {
        let mut s = spec();
        s.whole_link = Some("https://example.com/x".to_string());
        let svg = render_badge(&s).expect("render");
        assert!(svg.contains(r#"xlink:href="https://example.com/x""#));
        // 分段链接被整体链接取代
        assert!(!svg.contains(r#"xlink:href="https://atcoder.jp""#));
    }

    #[test]
    fn logo_widens_left_segment() {
        let without = render_badge(&spec()).expect("render");
        let mut s = spec();
        s.logo = Some("data:image/svg+xml;base64,PHN2Zy8+".to_string());
        let with = render_badge(&s).expect("render");
        assert!(with.contains("<image"));
        assert!(!without.contains("<image"));
    }
}
