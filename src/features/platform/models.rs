use serde::{Deserialize, Serialize};

/// 支持的竞赛平台（封闭枚举，路由层只会产生这三个值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Platform {
    Codeforces,
    TopCoder,
    AtCoder,
}

impl Platform {
    /// 徽章左段显示名
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::TopCoder => "TopCoder",
            Platform::AtCoder => "AtCoder",
        }
    }

    /// 路由段名（小写）
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::TopCoder => "topcoder",
            Platform::AtCoder => "atcoder",
        }
    }
}

/// 无评级时的显示文本
pub const UNRATED: &str = "unrated";

/// 评级无法归档时的兜底颜色
pub const FALLBACK_COLOR: &str = "black";

/// 一次适配器调用的产物：显示用评级与徽章右段颜色。
///
/// 不变量：`rating` 恒非空（无评级时为 "unrated"），
/// `color` 恒为有效颜色 token（rank/分段无法识别时为 "black"）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingResult {
    pub rating: String,
    pub color: String,
}

impl RatingResult {
    pub fn unrated() -> Self {
        Self {
            rating: UNRATED.to_string(),
            color: FALLBACK_COLOR.to_string(),
        }
    }
}

/// Codeforces rank → 颜色固定表。
///
/// 九个命名 rank 按 gray→green→cyan→blue→purple→orange→red 递进，
/// 表外（或缺失）的 rank 一律返回 "black"。
pub fn codeforces_rank_color(rank: &str) -> &'static str {
    match rank {
        "newbie" => "#808080",
        "pupil" => "#008000",
        "specialist" => "#00FFFF",
        "expert" => "#0000FF",
        "candidate master" => "#800080",
        "master" => "#FFA500",
        "international master" => "#FFA500",
        "grandmaster" => "#FF0000",
        "international grandmaster" => "#FF0000",
        "legendary grandmaster" => "#FF0000",
        _ => FALLBACK_COLOR,
    }
}

/// AtCoder 评级分段颜色（官方配色，阈值升序）。
pub fn atcoder_rating_color(rating: i64) -> &'static str {
    match rating {
        r if r < 400 => "#808080",
        r if r < 800 => "#804000",
        r if r < 1200 => "#008000",
        r if r < 1600 => "#00C0C0",
        r if r < 2000 => "#0000FF",
        r if r < 2400 => "#C0C000",
        r if r < 2800 => "#FF8000",
        _ => "#FF0000",
    }
}

/// 从 TopCoder `colorStyle`（形如 "color: #DDCC00"）提取颜色。
///
/// 取末尾 6 位十六进制并加 "#" 前缀；格式不符时返回 "black"。
pub fn topcoder_style_color(color_style: &str) -> String {
    let tail: String = {
        let chars: Vec<char> = color_style.chars().collect();
        if chars.len() < 6 {
            return FALLBACK_COLOR.to_string();
        }
        chars[chars.len() - 6..].iter().collect()
    };
    if tail.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{tail}")
    } else {
        FALLBACK_COLOR.to_string()
    }
}
