/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 评级缓存模块
pub mod cache;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// HTTP Client 复用工具
pub mod http;

// 导出常用类型供外部使用
pub use cache::RatingCache;
pub use config::AppConfig;
pub use error::AppError;
