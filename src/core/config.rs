//! 配置管理模块
//!
//! 探测项选择、超时与输出配置，以及固定的外部端点

use std::path::PathBuf;
use std::time::Duration;

/// 系统解析器配置文件
pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

/// 外部 IP 回显服务
pub const EXTERNAL_IP_URL: &str = "https://api.ipify.org";

/// 连通性检测目标
pub const CONNECTIVITY_TARGET: &str = "8.8.8.8";

/// 延迟测量目标
pub const LATENCY_HOST: &str = "google.com";

/// 延迟测量发送的回显请求数
pub const LATENCY_ECHO_COUNT: u32 = 4;

/// 默认 ping 超时（秒）
pub const DEFAULT_PING_TIMEOUT_SECS: u64 = 1;

/// 默认 HTTP 超时（秒）
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// 探测项选择
///
/// 与命令行布尔开关一一对应
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSelection {
    pub all: bool,
    pub local_ip: bool,
    pub external_ip: bool,
    pub gateway_ip: bool,
    pub dns: bool,
    pub subnet_mask: bool,
    pub ipv6: bool,
    pub broadcast: bool,
    pub mac: bool,
    pub gateway_ipv6: bool,
    pub signal: bool,
    /// 全部探测项 + 延迟测量
    pub test: bool,
}

impl ProbeSelection {
    /// 全选（等同于 `--all`）
    pub fn everything() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// 是否设置了任一具体选择项（`all` 除外）
    pub fn has_specific(&self) -> bool {
        self.local_ip
            || self.external_ip
            || self.gateway_ip
            || self.dns
            || self.subnet_mask
            || self.ipv6
            || self.broadcast
            || self.mac
            || self.gateway_ipv6
            || self.signal
            || self.test
    }

    /// 未指定任何具体选择项时视为 `--all`
    pub fn resolve(mut self) -> Self {
        if !self.has_specific() {
            self.all = true;
        }
        self
    }

    /// `all` 或 `test` 时所有常规探测项均启用
    pub fn covers_everything(&self) -> bool {
        self.all || self.test
    }
}

/// 运行配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 已解析的探测项选择
    pub selection: ProbeSelection,
    /// ping 超时（秒）
    pub timeout_secs: u64,
    /// 外部 IP 请求超时（秒）
    pub http_timeout_secs: u64,
    /// 追加写入的日志文件
    pub logfile: Option<PathBuf>,
    /// 附加本机 IP 的反向解析行
    pub resolve_hostname: bool,
    /// 输出配置
    pub output: OutputConfig,
}

/// 输出配置
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// 使用彩色输出
    pub use_colors: bool,
    /// 显示探测进度
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selection: ProbeSelection::everything(),
            timeout_secs: DEFAULT_PING_TIMEOUT_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            logfile: None,
            resolve_hostname: false,
            output: OutputConfig {
                use_colors: true,
                show_progress: true,
            },
        }
    }
}

impl Config {
    /// 外部 IP 请求超时
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_resolves_to_all() {
        let resolved = ProbeSelection::default().resolve();
        assert_eq!(resolved, ProbeSelection::everything());
    }

    #[test]
    fn test_specific_flag_keeps_all_off() {
        let sel = ProbeSelection {
            dns: true,
            ..Default::default()
        }
        .resolve();
        assert!(!sel.all);
        assert!(sel.dns);
        assert!(!sel.covers_everything());
    }

    #[test]
    fn test_test_flag_is_specific() {
        let sel = ProbeSelection {
            test: true,
            ..Default::default()
        }
        .resolve();
        assert!(!sel.all);
        assert!(sel.covers_everything());
    }

    #[test]
    fn test_every_single_flag_is_specific() {
        let singles = [
            ProbeSelection { local_ip: true, ..Default::default() },
            ProbeSelection { external_ip: true, ..Default::default() },
            ProbeSelection { gateway_ip: true, ..Default::default() },
            ProbeSelection { dns: true, ..Default::default() },
            ProbeSelection { subnet_mask: true, ..Default::default() },
            ProbeSelection { ipv6: true, ..Default::default() },
            ProbeSelection { broadcast: true, ..Default::default() },
            ProbeSelection { mac: true, ..Default::default() },
            ProbeSelection { gateway_ipv6: true, ..Default::default() },
            ProbeSelection { signal: true, ..Default::default() },
        ];
        for sel in singles {
            assert!(sel.has_specific());
            assert!(!sel.resolve().all);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, 1);
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert!(config.logfile.is_none());
        assert!(config.selection.all);
    }
}
