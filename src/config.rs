use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::features::platform::Platform;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（RUST_LOG 未设置时的兜底 filter）
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "cp_badges=info,tower_http=info".to_string(),
        }
    }
}

/// 评级缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 缓存 TTL（秒），过期后下次访问会重新请求上游
    #[serde(default = "CacheConfig::default_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    fn default_ttl_secs() -> u64 {
        300
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: Self::default_ttl_secs(),
        }
    }
}

/// 上游请求配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 上游请求超时（秒）。超时按“未找到”处理（见 error 模块）。
    #[serde(default = "UpstreamConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    fn default_timeout_secs() -> u64 {
        8
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// 单个平台的端点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// 评级查询 API 端点
    pub api_url: String,
    /// 平台主页（徽章左段默认跳转目标）
    pub base_url: String,
    /// 用户主页模板，包含 `{handle}` 占位符（徽章右段默认跳转目标）
    pub profile_url: String,
    /// 徽章内嵌 logo（data URI 或外链），留空则不渲染 logo
    #[serde(default)]
    pub logo: Option<String>,
}

impl PlatformConfig {
    /// 将 `{handle}` 占位符替换为实际 handle，得到用户主页地址。
    pub fn profile_url_for(&self, handle: &str) -> String {
        self.profile_url.replace("{handle}", handle)
    }
}

/// 三个平台的端点配置集合
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformsConfig {
    pub codeforces: PlatformConfig,
    pub topcoder: PlatformConfig,
    pub atcoder: PlatformConfig,
}

impl PlatformsConfig {
    pub fn get(&self, platform: Platform) -> &PlatformConfig {
        match platform {
            Platform::Codeforces => &self.codeforces,
            Platform::TopCoder => &self.topcoder,
            Platform::AtCoder => &self.atcoder,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// 评级缓存配置
    pub cache: CacheConfig,
    /// 上游请求配置
    pub upstream: UpstreamConfig,
    /// 平台端点配置
    pub platforms: PlatformsConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    ///
    /// 配置文件可缺省：所有平台端点都有硬编码默认值，
    /// 纯默认配置即可直接运行。
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();

        let builder = ConfigBuilder::builder()
            // 加载配置文件（允许缺失）
            .add_source(File::with_name(config_path.to_str().unwrap()).required(false))
            // 支持环境变量覆盖，例如：APP_SERVER_PORT
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = builder.try_deserialize()?;
        Ok(config)
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 缓存 TTL
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache.ttl_secs)
    }
}

/// 三个平台的硬编码默认端点
impl Default for PlatformsConfig {
    fn default() -> Self {
        Self {
            codeforces: PlatformConfig {
                api_url: "https://codeforces.com/api/user.info".to_string(),
                base_url: "https://codeforces.com".to_string(),
                profile_url: "https://codeforces.com/profile/{handle}".to_string(),
                logo: None,
            },
            topcoder: PlatformConfig {
                api_url: "https://api.topcoder.com/v2/users".to_string(),
                base_url: "https://www.topcoder.com".to_string(),
                profile_url: "https://www.topcoder.com/members/{handle}".to_string(),
                logo: None,
            },
            atcoder: PlatformConfig {
                api_url: "https://atcoder.jp".to_string(),
                base_url: "https://atcoder.jp".to_string(),
                profile_url: "https://atcoder.jp/users/{handle}".to_string(),
                logo: None,
            },
        }
    }
}
