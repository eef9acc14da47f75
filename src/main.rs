//! netinfo - 本机网络信息查看工具

mod collector;
mod core;
mod modules;
mod output;

use clap::{ArgAction, Parser};
use collector::{append_log, needs_connectivity, InfoCollector, ProbeContext};
use core::config::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PING_TIMEOUT_SECS};
use core::{Config, OutputConfig, ProbeSelection};
use modules::collect::collect_hostname;
use output::{print_error, print_success, print_warning, Reporter};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// netinfo - 本机网络信息查看工具
#[derive(Parser, Debug)]
#[command(
    name = "netinfo",
    author = "BlkSword",
    version = "0.2.0",
    about = "Display network information",
    long_about = None,
)]
struct Cli {
    /// 显示全部信息（未指定任何选择项时的默认行为）
    #[arg(long)]
    all: bool,

    /// 本机 IPv4 地址
    #[arg(long)]
    local_ip: bool,

    /// 外部 IP 地址
    #[arg(long)]
    external_ip: bool,

    /// 默认网关 IPv4
    #[arg(long)]
    gateway_ip: bool,

    /// DNS 服务器
    #[arg(long)]
    dns: bool,

    /// 子网掩码
    #[arg(long)]
    subnet_mask: bool,

    /// IPv6 地址
    #[arg(long)]
    ipv6: bool,

    /// 广播地址
    #[arg(long)]
    broadcast: bool,

    /// MAC 地址
    #[arg(long)]
    mac: bool,

    /// 默认网关 IPv6
    #[arg(long)]
    gateway_ipv6: bool,

    /// 无线信号强度
    #[arg(long)]
    signal: bool,

    /// 全部信息 + 延迟测量
    #[arg(long)]
    test: bool,

    /// ping 超时（秒）
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_PING_TIMEOUT_SECS)]
    timeout: u64,

    /// 外部 IP 请求超时（秒）
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    http_timeout: u64,

    /// 将报告追加写入文件
    #[arg(short, long, value_name = "FILE")]
    logfile: Option<PathBuf>,

    /// 附加本机 IP 的反向解析结果
    #[arg(long)]
    resolve: bool,

    /// 静默模式 (不显示进度)
    #[arg(short, long)]
    quiet: bool,

    /// 关闭彩色输出
    #[arg(long)]
    no_color: bool,

    /// 诊断日志级别 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn selection(&self) -> ProbeSelection {
        ProbeSelection {
            all: self.all,
            local_ip: self.local_ip,
            external_ip: self.external_ip,
            gateway_ip: self.gateway_ip,
            dns: self.dns,
            subnet_mask: self.subnet_mask,
            ipv6: self.ipv6,
            broadcast: self.broadcast,
            mac: self.mac,
            gateway_ipv6: self.gateway_ipv6,
            signal: self.signal,
            test: self.test,
        }
        .resolve()
    }

    fn into_config(self) -> Config {
        Config {
            selection: self.selection(),
            timeout_secs: self.timeout,
            http_timeout_secs: self.http_timeout,
            logfile: self.logfile,
            resolve_hostname: self.resolve,
            output: OutputConfig {
                use_colors: !self.no_color,
                show_progress: !self.quiet,
            },
        }
    }
}

/// 根据 `-v` 次数选择默认日志级别
fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// 初始化诊断日志（输出到 stderr，RUST_LOG 优先）
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();
    debug!(?config, "运行配置");

    let reporter = Reporter::new(config.output);
    reporter.print_host_name(&collect_hostname());

    let collector = InfoCollector::new(ProbeContext::system(&config));

    if needs_connectivity(&config.selection) && !collector.context().check_connectivity() {
        print_warning("No internet connectivity detected; external probes may fail.");
    }

    let spinner = reporter.spinner();
    let report = collector.collect_with_progress(&config, &spinner);
    reporter.print_report(&report);

    if let Some(path) = &config.logfile {
        match append_log(path, &Reporter::plain_text(&report)) {
            Ok(()) => {
                info!(path = %path.display(), "日志写入完成");
                print_success(&format!("Output logged to {}", path.display()));
            }
            Err(e) => {
                print_error(&format!("无法写入日志文件 {}: {}", path.display(), e));
                std::process::exit(1);
            }
        }
    }
}
