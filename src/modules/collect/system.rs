//! 主机名信息
//!
//! 本机主机名与 IP 反向解析

use std::net::IpAddr;
use tracing::debug;

/// 收集本机主机名
pub fn collect_hostname() -> String {
    match whoami::fallible::hostname() {
        Ok(name) => name,
        Err(e) => {
            debug!(error = %e, "获取主机名失败");
            "unknown".to_string()
        }
    }
}

/// 反向解析 IP 地址，失败或输入不是 IP 时返回 `None`
pub fn reverse_lookup(ip: &str) -> Option<String> {
    let addr: IpAddr = ip.parse().ok()?;
    match dns_lookup::lookup_addr(&addr) {
        // 没有 PTR 记录时部分平台会原样返回地址
        Ok(name) if name != ip => Some(name),
        Ok(_) => None,
        Err(e) => {
            debug!(ip, error = %e, "反向解析失败");
            None
        }
    }
}
