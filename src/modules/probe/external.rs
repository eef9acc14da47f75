//! 外部 IP 查询

use crate::core::config::EXTERNAL_IP_URL;
use crate::core::Result;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// 外部 IP 获取失败占位
pub const EXTERNAL_IP_FAILED: &str = "Could not retrieve external IP";

/// 外部 IP 来源
pub trait ExternalIpSource {
    fn fetch(&self) -> Result<String>;
}

/// 通过 HTTP 回显服务获取外部 IP
pub struct HttpExternalIp {
    url: String,
    timeout: Duration,
}

impl HttpExternalIp {
    pub fn new(timeout: Duration) -> Self {
        Self::with_url(EXTERNAL_IP_URL, timeout)
    }

    pub fn with_url(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            timeout,
        }
    }
}

impl ExternalIpSource for HttpExternalIp {
    fn fetch(&self) -> Result<String> {
        debug!(url = %self.url, timeout = ?self.timeout, "请求外部 IP");

        let client = Client::builder().timeout(self.timeout).build()?;
        let body = client.get(&self.url).send()?.error_for_status()?.text()?;

        Ok(body.trim().to_string())
    }
}

/// 获取外部 IP，失败时返回占位文本
pub fn external_ip(source: &dyn ExternalIpSource) -> String {
    match source.fetch() {
        Ok(ip) if !ip.is_empty() => ip,
        Ok(_) => {
            debug!("外部 IP 服务返回空响应");
            EXTERNAL_IP_FAILED.to_string()
        }
        Err(e) => {
            debug!(error = %e, "外部 IP 获取失败");
            EXTERNAL_IP_FAILED.to_string()
        }
    }
}

#[cfg(test)]
pub struct FixedExternalIp(pub Option<String>);

#[cfg(test)]
impl ExternalIpSource for FixedExternalIp {
    fn fetch(&self) -> Result<String> {
        self.0.clone().ok_or_else(|| crate::core::NetInfoError::Unsupported {
            operation: "offline".to_string(),
        })
    }
}
