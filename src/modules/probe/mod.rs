//! 连通性探测模块
//!
//! ping、无线信号、外部 IP 等依赖外部命令或网络请求的探测

pub mod command;
pub mod external;
pub mod ping;
pub mod wireless;

pub use command::{CommandRunner, SystemRunner};
pub use external::{ExternalIpSource, HttpExternalIp};
pub use ping::Pinger;

use regex::Regex;

/// 返回正则第一个捕获组
pub(crate) fn capture_first(pattern: &str, text: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
