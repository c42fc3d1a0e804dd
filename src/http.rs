use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

/// 全局复用的 HTTP Client（统一连接池/Keep-Alive），避免每次请求重复创建。
///
/// `Client` 本身是线程安全的，适合全局复用。
static CLIENT_UPSTREAM: OnceCell<Client> = OnceCell::new();

/// 上游平台统一使用的 HTTP Client，带显式 timeout。
///
/// timeout 取自配置（默认 8s）；超时在 error 模块被映射为“未找到”。
pub fn client_upstream(timeout: Duration) -> Result<&'static Client, reqwest::Error> {
    CLIENT_UPSTREAM.get_or_try_init(|| Client::builder().timeout(timeout).build())
}
