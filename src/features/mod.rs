/// 徽章渲染与路由
pub mod badge;

/// 健康检查
pub mod health;

/// 平台评级适配器
pub mod platform;
