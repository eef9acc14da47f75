//! 统一信息收集模块
//!
//! 按固定顺序执行所选探测项，汇总为报告

pub mod models;
pub use models::{ProbeResult, Report};

use crate::core::config::RESOLV_CONF_PATH;
use crate::core::{Config, ProbeSelection, Result};
use crate::modules::collect::{reverse_lookup, DnsCollector, NetworkCollector, NetworkSource, SystemNetwork};
use crate::modules::probe::{external, wireless};
use crate::modules::probe::{CommandRunner, ExternalIpSource, HttpExternalIp, Pinger, SystemRunner};
use crate::output::progress::StatusSpinner;
use models::{display_or_na, NOT_AVAILABLE};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// 探测所需的外部依赖
pub struct ProbeContext {
    pub network: Box<dyn NetworkSource>,
    pub runner: Box<dyn CommandRunner>,
    pub external: Box<dyn ExternalIpSource>,
    pub resolv_conf: PathBuf,
    pub timeout_secs: u64,
}

impl ProbeContext {
    /// 使用真实系统依赖
    pub fn system(config: &Config) -> Self {
        Self {
            network: Box::new(SystemNetwork),
            runner: Box::new(SystemRunner),
            external: Box::new(HttpExternalIp::new(config.http_timeout())),
            resolv_conf: PathBuf::from(RESOLV_CONF_PATH),
            timeout_secs: config.timeout_secs,
        }
    }

    fn network(&self) -> NetworkCollector<'_> {
        NetworkCollector::new(self.network.as_ref())
    }

    fn pinger(&self) -> Pinger<'_> {
        Pinger::new(self.runner.as_ref(), self.timeout_secs)
    }

    fn dns(&self) -> DnsCollector<'_> {
        DnsCollector::new(&self.resolv_conf)
    }

    /// 到公共地址的连通性
    pub fn check_connectivity(&self) -> bool {
        self.pinger().check_connectivity()
    }
}

/// 探测项：启用条件、行标签、执行函数
pub struct ProbeEntry {
    /// 进度提示
    pub status: &'static str,
    /// 产生的行标签，与 `run` 返回的值一一对应
    pub labels: &'static [&'static str],
    pub enabled: fn(&Config) -> bool,
    pub run: fn(&ProbeContext) -> Vec<String>,
}

/// 按报告顺序排列的探测表
pub const PROBES: &[ProbeEntry] = &[
    ProbeEntry {
        status: "获取本机 IP...",
        labels: &["Local IP"],
        enabled: |c| c.selection.covers_everything() || c.selection.local_ip,
        run: probe_local_ip,
    },
    ProbeEntry {
        status: "反向解析本机 IP...",
        labels: &["Local Hostname"],
        enabled: |c| c.resolve_hostname,
        run: probe_local_hostname,
    },
    ProbeEntry {
        status: "获取外部 IP...",
        labels: &["External IP"],
        enabled: |c| c.selection.covers_everything() || c.selection.external_ip,
        run: probe_external_ip,
    },
    ProbeEntry {
        status: "获取网关 IP...",
        labels: &["Router IP"],
        enabled: |c| c.selection.covers_everything() || c.selection.gateway_ip,
        run: probe_gateway_ip,
    },
    ProbeEntry {
        status: "获取 DNS 服务器...",
        labels: &["DNS Servers", "IPv6 DNS Servers"],
        enabled: |c| c.selection.covers_everything() || c.selection.dns,
        run: probe_dns,
    },
    ProbeEntry {
        status: "获取子网掩码...",
        labels: &["Subnet Mask"],
        enabled: |c| c.selection.covers_everything() || c.selection.subnet_mask,
        run: probe_subnet_mask,
    },
    ProbeEntry {
        status: "获取 IPv6 地址...",
        labels: &["IPv6 Address"],
        enabled: |c| c.selection.covers_everything() || c.selection.ipv6,
        run: probe_ipv6,
    },
    ProbeEntry {
        status: "获取广播地址...",
        labels: &["Broadcast Address"],
        enabled: |c| c.selection.covers_everything() || c.selection.broadcast,
        run: probe_broadcast,
    },
    ProbeEntry {
        status: "获取 MAC 地址...",
        labels: &["MAC Address"],
        enabled: |c| c.selection.covers_everything() || c.selection.mac,
        run: probe_mac,
    },
    ProbeEntry {
        status: "获取 IPv6 网关...",
        labels: &["Default Gateway IPv6"],
        enabled: |c| c.selection.covers_everything() || c.selection.gateway_ipv6,
        run: probe_gateway_ipv6,
    },
    ProbeEntry {
        status: "获取信号强度...",
        labels: &["Signal Strength"],
        enabled: |c| c.selection.covers_everything() || c.selection.signal,
        run: probe_signal,
    },
    ProbeEntry {
        status: "测量延迟...",
        labels: &["Latency"],
        enabled: |c| c.selection.test,
        run: probe_latency,
    },
];

// ==================== 探测函数 ====================

fn probe_local_ip(ctx: &ProbeContext) -> Vec<String> {
    let local = ctx.network().local_ipv4();
    let ping = ctx.pinger().ping_address(local.value.as_deref());
    vec![format!(
        "{} (Interface: {}) - Ping: {}",
        display_or_na(local.value.as_deref()),
        display_or_na(local.interface.as_deref()),
        ping
    )]
}

fn probe_local_hostname(ctx: &ProbeContext) -> Vec<String> {
    let local = ctx.network().local_ipv4();
    let hostname = local.value.as_deref().and_then(reverse_lookup);
    vec![display_or_na(hostname.as_deref()).to_string()]
}

fn probe_external_ip(ctx: &ProbeContext) -> Vec<String> {
    let ip = external::external_ip(ctx.external.as_ref());
    let ping = ctx.pinger().ping_address(Some(&ip));
    vec![format!("{} - Ping: {}", ip, ping)]
}

fn probe_gateway_ip(ctx: &ProbeContext) -> Vec<String> {
    let gateway = ctx.network().gateway_ipv4();
    let ping = ctx.pinger().ping_address(gateway.as_deref());
    vec![format!("{} - Ping: {}", display_or_na(gateway.as_deref()), ping)]
}

fn probe_dns(ctx: &ProbeContext) -> Vec<String> {
    let dns = ctx.dns();
    vec![
        join_or_na(&dns.dns_servers()),
        join_or_na(&dns.dns_servers_ipv6()),
    ]
}

fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(", ")
    }
}

fn probe_subnet_mask(ctx: &ProbeContext) -> Vec<String> {
    let mask = ctx.network().subnet_mask();
    vec![format!(
        "{} (Interface: {})",
        display_or_na(mask.value.as_deref()),
        display_or_na(mask.interface.as_deref())
    )]
}

fn probe_ipv6(ctx: &ProbeContext) -> Vec<String> {
    let ipv6 = ctx.network().ipv6_address();
    let ping = ctx.pinger().ping_address(ipv6.value.as_deref());
    vec![format!(
        "{} (Interface: {}) - Ping: {}",
        display_or_na(ipv6.value.as_deref()),
        display_or_na(ipv6.interface.as_deref()),
        ping
    )]
}

fn probe_broadcast(ctx: &ProbeContext) -> Vec<String> {
    let broadcast = ctx.network().broadcast_address();
    vec![format!(
        "{} (Interface: {})",
        display_or_na(broadcast.value.as_deref()),
        display_or_na(broadcast.interface.as_deref())
    )]
}

fn probe_mac(ctx: &ProbeContext) -> Vec<String> {
    let network = ctx.network();
    let interface = network.local_ipv4().interface;
    let mac = interface.as_deref().and_then(|name| network.mac_address(name));
    vec![format!(
        "{} (Interface: {})",
        display_or_na(mac.as_deref()),
        display_or_na(interface.as_deref())
    )]
}

fn probe_gateway_ipv6(ctx: &ProbeContext) -> Vec<String> {
    let gateway = ctx.network().gateway_ipv6();
    vec![display_or_na(gateway.as_deref()).to_string()]
}

fn probe_signal(ctx: &ProbeContext) -> Vec<String> {
    let interface = ctx.network().local_ipv4().interface;
    vec![wireless::signal_strength(
        ctx.runner.as_ref(),
        interface.as_deref(),
    )]
}

fn probe_latency(ctx: &ProbeContext) -> Vec<String> {
    vec![ctx.pinger().measure_latency()]
}

// ==================== 收集器 ====================

/// 所选探测项将产生的行标签（不执行探测）
#[cfg(test)]
pub fn planned_labels(config: &Config) -> Vec<&'static str> {
    PROBES
        .iter()
        .filter(|entry| (entry.enabled)(config))
        .flat_map(|entry| entry.labels.iter().copied())
        .collect()
}

/// 是否需要外部连通性
pub fn needs_connectivity(selection: &ProbeSelection) -> bool {
    selection.covers_everything() || selection.external_ip
}

/// 统一信息收集器
pub struct InfoCollector {
    context: ProbeContext,
}

impl InfoCollector {
    /// 创建新的信息收集器
    pub fn new(context: ProbeContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ProbeContext {
        &self.context
    }

    /// 按顺序执行所选探测项（带进度显示）
    pub fn collect_with_progress(&self, config: &Config, progress: &StatusSpinner) -> Report {
        let start = Instant::now();
        let mut report = Report::default();

        for entry in PROBES.iter().filter(|entry| (entry.enabled)(config)) {
            progress.set_status(entry.status);
            let probe_start = Instant::now();

            let values = (entry.run)(&self.context);
            debug_assert_eq!(values.len(), entry.labels.len());

            for (&label, value) in entry.labels.iter().zip(values) {
                debug!(label, value = %value, elapsed = ?probe_start.elapsed(), "探测完成");
                report.push(ProbeResult::new(label, value));
            }
        }

        progress.finish();
        info!(rows = report.len(), elapsed = ?start.elapsed(), "报告收集完成");

        report
    }

    /// 按顺序执行所选探测项（无进度显示）
    #[cfg(test)]
    pub fn collect(&self, config: &Config) -> Report {
        self.collect_with_progress(config, &StatusSpinner::hidden())
    }
}

/// 将报告文本追加到日志文件（不存在时创建）
pub fn append_log(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", content)?;
    info!(path = %path.display(), bytes = content.len() + 1, "报告已追加到日志文件");
    Ok(())
}
