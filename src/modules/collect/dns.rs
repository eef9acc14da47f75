//! DNS 服务器收集
//!
//! 读取系统解析器配置文件中的 nameserver 条目

use std::fs;
use std::path::Path;
use tracing::debug;

/// 读取失败时的占位条目
pub fn read_failure_placeholder(path: &Path) -> String {
    format!("Could not read {}", path.display())
}

/// 解析所有 `nameserver` 行的地址
pub fn parse_nameservers(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.starts_with("nameserver"))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            // "nameserverX 1.2.3.4" 不是合法指令
            (parts.next() == Some("nameserver"))
                .then(|| parts.next())
                .flatten()
                .map(str::to_string)
        })
        .collect()
}

/// 仅保留 IPv6 地址（含冒号）
pub fn ipv6_only(servers: &[String]) -> Vec<String> {
    servers
        .iter()
        .filter(|server| server.contains(':'))
        .cloned()
        .collect()
}

/// DNS 服务器收集器
pub struct DnsCollector<'a> {
    path: &'a Path,
}

impl<'a> DnsCollector<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<Vec<String>, String> {
        match fs::read_to_string(self.path) {
            Ok(content) => Ok(parse_nameservers(&content)),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "读取解析器配置失败");
                Err(read_failure_placeholder(self.path))
            }
        }
    }

    /// 所有 DNS 服务器；文件不可读时返回单个占位条目
    pub fn dns_servers(&self) -> Vec<String> {
        self.read().unwrap_or_else(|placeholder| vec![placeholder])
    }

    /// IPv6 DNS 服务器；文件不可读时返回单个占位条目
    pub fn dns_servers_ipv6(&self) -> Vec<String> {
        match self.read() {
            Ok(servers) => ipv6_only(&servers),
            Err(placeholder) => vec![placeholder],
        }
    }
}
