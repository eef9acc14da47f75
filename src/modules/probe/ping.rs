//! ICMP 连通性探测
//!
//! 通过系统 ping 命令实现单次探测、连通性检查和延迟统计

use super::command::CommandRunner;
use super::capture_first;
use crate::core::config::{CONNECTIVITY_TARGET, LATENCY_ECHO_COUNT, LATENCY_HOST};
use crate::core::{NetInfoError, Result};
use tracing::debug;

/// ping 无响应占位
pub const NO_RESPONSE: &str = "No response";

/// 延迟测量失败占位
pub const LATENCY_FAILED: &str = "Latency measurement failed";

/// 延迟统计行缺失占位
pub const LATENCY_UNAVAILABLE: &str = "Latency measurement not available";

const PING_PROGRAM: &str = "ping";

/// 生成平台相关的 ping 参数
pub fn ping_args(address: &str, count: u32, timeout_secs: u64) -> Vec<String> {
    let mut args = Vec::with_capacity(5);

    if cfg!(windows) {
        // Windows: -n 次数, -w 毫秒
        args.extend(["-n".to_string(), count.to_string()]);
        args.extend(["-w".to_string(), timeout_secs.saturating_mul(1000).to_string()]);
    } else if cfg!(any(
        target_os = "macos",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd"
    )) {
        args.extend(["-c".to_string(), count.to_string()]);
        args.extend(["-t".to_string(), timeout_secs.to_string()]);
    } else {
        args.extend(["-c".to_string(), count.to_string()]);
        args.extend(["-W".to_string(), timeout_secs.to_string()]);
    }

    args.push(address.to_string());
    args
}

/// 目标是否可以安全地交给 ping
///
/// 空串、含空白或以 `-` 开头（会被当作选项）的输入一律拒绝
pub fn is_valid_target(address: &str) -> bool {
    !address.is_empty()
        && !address.starts_with('-')
        && !address.chars().any(char::is_whitespace)
}

/// 从单次 ping 输出中提取往返时间（毫秒）
///
/// 兼容 `time=12.3 ms`、`time=12ms`、`time<1ms` 等写法
pub fn parse_round_trip(stdout: &str) -> Option<String> {
    capture_first(r"time[=<]\s*([0-9]+(?:\.[0-9]+)?)\s*ms", stdout)
}

/// 提取 `min/avg/max/mdev` 统计行中 `=` 之后的内容
pub fn parse_rtt_summary(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find(|line| line.contains("min/avg/max"))
        .and_then(|line| line.rsplit('=').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// ping 探测器
pub struct Pinger<'a> {
    runner: &'a dyn CommandRunner,
    timeout_secs: u64,
}

impl<'a> Pinger<'a> {
    /// 创建新的 ping 探测器
    pub fn new(runner: &'a dyn CommandRunner, timeout_secs: u64) -> Self {
        Self {
            runner,
            timeout_secs,
        }
    }

    /// 单次 ping，返回 `"<t> ms"` 或 `"No response"`
    pub fn ping_address(&self, address: Option<&str>) -> String {
        let Some(address) = address.filter(|a| is_valid_target(a)) else {
            debug!(?address, "无效的 ping 目标");
            return NO_RESPONSE.to_string();
        };

        match self.try_ping(address) {
            Ok(rtt) => format!("{} ms", rtt),
            Err(e) => {
                debug!(address, error = %e, "ping 失败");
                NO_RESPONSE.to_string()
            }
        }
    }

    fn try_ping(&self, address: &str) -> Result<String> {
        let args = ping_args(address, 1, self.timeout_secs);
        let output = self.runner.run(PING_PROGRAM, &args)?.checked(PING_PROGRAM)?;

        parse_round_trip(&output.stdout)
            .ok_or_else(|| NetInfoError::parse("ping 往返时间", output.stdout.trim()))
    }

    /// 检查到公共地址的连通性
    pub fn check_connectivity(&self) -> bool {
        let args = ping_args(CONNECTIVITY_TARGET, 1, self.timeout_secs);
        match self.runner.run(PING_PROGRAM, &args) {
            Ok(output) => output.success,
            Err(e) => {
                debug!(error = %e, "连通性检查失败");
                false
            }
        }
    }

    /// 测量到固定主机的延迟统计
    pub fn measure_latency(&self) -> String {
        let args = ping_args(LATENCY_HOST, LATENCY_ECHO_COUNT, self.timeout_secs);

        let output = match self
            .runner
            .run(PING_PROGRAM, &args)
            .and_then(|o| o.checked(PING_PROGRAM))
        {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, "延迟测量失败");
                return LATENCY_FAILED.to_string();
            }
        };

        parse_rtt_summary(&output.stdout).unwrap_or_else(|| LATENCY_UNAVAILABLE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::probe::command::{CommandOutput, ScriptedRunner};

    const LINUX_SINGLE: &str = "PING 192.168.1.1 (192.168.1.1) 56(84) bytes of data.
64 bytes from 192.168.1.1: icmp_seq=1 ttl=64 time=0.412 ms

--- 192.168.1.1 ping statistics ---
1 packets transmitted, 1 received, 0% packet loss, time 0ms
rtt min/avg/max/mdev = 0.412/0.412/0.412/0.000 ms
";

    const LINUX_LATENCY: &str = "PING google.com (142.250.74.46) 56(84) bytes of data.
64 bytes from arn09s22-in-f14.1e100.net (142.250.74.46): icmp_seq=1 ttl=117 time=11.2 ms
64 bytes from arn09s22-in-f14.1e100.net (142.250.74.46): icmp_seq=2 ttl=117 time=10.9 ms

--- google.com ping statistics ---
4 packets transmitted, 4 received, 0% packet loss, time 3004ms
rtt min/avg/max/mdev = 10.912/11.087/11.301/0.147 ms
";

    const MACOS_LATENCY: &str = "--- google.com ping statistics ---
4 packets transmitted, 4 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 12.101/13.442/15.010/1.101 ms
";

    #[test]
    fn test_parse_round_trip() {
        assert_eq!(parse_round_trip(LINUX_SINGLE), Some("0.412".to_string()));
        assert_eq!(
            parse_round_trip("Reply from 8.8.8.8: bytes=32 time=14ms TTL=117"),
            Some("14".to_string())
        );
        assert_eq!(
            parse_round_trip("Reply from 10.0.0.1: bytes=32 time<1ms TTL=64"),
            Some("1".to_string())
        );
        assert_eq!(parse_round_trip("Request timed out."), None);
    }

    #[test]
    fn test_parse_rtt_summary() {
        assert_eq!(
            parse_rtt_summary(LINUX_LATENCY),
            Some("10.912/11.087/11.301/0.147 ms".to_string())
        );
        assert_eq!(
            parse_rtt_summary(MACOS_LATENCY),
            Some("12.101/13.442/15.010/1.101 ms".to_string())
        );
        assert_eq!(parse_rtt_summary("no statistics here"), None);
    }

    #[test]
    fn test_is_valid_target() {
        assert!(is_valid_target("8.8.8.8"));
        assert!(is_valid_target("fe80::1"));
        assert!(!is_valid_target(""));
        assert!(!is_valid_target("-f"));
        assert!(!is_valid_target("1.1.1.1 -c 100"));
    }

    #[test]
    fn test_ping_args_end_with_address() {
        let args = ping_args("10.0.0.1", 1, 2);
        assert_eq!(args.last().map(String::as_str), Some("10.0.0.1"));
        assert!(args.contains(&"1".to_string()));
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let args = ping_args("10.0.0.1", 1, u64::MAX);
        assert!(args.contains(&u64::MAX.to_string()));

        let runner = ScriptedRunner::new().respond("ping", CommandOutput::ok(LINUX_SINGLE));
        assert_eq!(Pinger::new(&runner, u64::MAX).ping_address(Some("10.0.0.1")), "0.412 ms");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_ping_args() {
        assert_eq!(ping_args("google.com", 4, 1), ["-c", "4", "-W", "1", "google.com"]);
    }

    #[test]
    fn test_ping_success() {
        let runner = ScriptedRunner::new().respond("ping", CommandOutput::ok(LINUX_SINGLE));
        let pinger = Pinger::new(&runner, 1);
        assert_eq!(pinger.ping_address(Some("192.168.1.1")), "0.412 ms");
    }

    #[test]
    fn test_ping_never_fails() {
        let runner = ScriptedRunner::new().respond("ping", CommandOutput::failed("unknown host"));
        let pinger = Pinger::new(&runner, 1);

        for input in [Some("not an address"), Some("-oops"), Some(""), None, Some("10.255.255.1")] {
            let result = pinger.ping_address(input);
            assert!(result == NO_RESPONSE || result.ends_with(" ms"));
            assert_eq!(result, NO_RESPONSE);
        }
    }

    #[test]
    fn test_ping_missing_program() {
        let runner = ScriptedRunner::new();
        let pinger = Pinger::new(&runner, 1);
        assert_eq!(pinger.ping_address(Some("8.8.8.8")), NO_RESPONSE);
    }

    #[test]
    fn test_ping_success_without_time_is_no_response() {
        let runner = ScriptedRunner::new().respond("ping", CommandOutput::ok("garbled"));
        let pinger = Pinger::new(&runner, 1);
        assert_eq!(pinger.ping_address(Some("8.8.8.8")), NO_RESPONSE);
    }

    #[test]
    fn test_invalid_target_never_spawns() {
        let runner = ScriptedRunner::new().respond("ping", CommandOutput::ok(LINUX_SINGLE));
        let pinger = Pinger::new(&runner, 1);
        pinger.ping_address(Some("--help"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_check_connectivity() {
        let up = ScriptedRunner::new().respond("ping", CommandOutput::ok(LINUX_SINGLE));
        assert!(Pinger::new(&up, 1).check_connectivity());
        assert_eq!(up.calls()[0].1.last().map(String::as_str), Some("8.8.8.8"));

        let down = ScriptedRunner::new().respond("ping", CommandOutput::failed(""));
        assert!(!Pinger::new(&down, 1).check_connectivity());
    }

    #[test]
    fn test_measure_latency() {
        let runner = ScriptedRunner::new().respond("ping", CommandOutput::ok(LINUX_LATENCY));
        let pinger = Pinger::new(&runner, 1);
        assert_eq!(pinger.measure_latency(), "10.912/11.087/11.301/0.147 ms");

        let (program, args) = &runner.calls()[0];
        assert_eq!(program, "ping");
        assert!(args.contains(&"4".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("google.com"));
    }

    #[test]
    fn test_measure_latency_placeholders() {
        let failed = ScriptedRunner::new().respond("ping", CommandOutput::failed(""));
        assert_eq!(Pinger::new(&failed, 1).measure_latency(), LATENCY_FAILED);

        let missing = ScriptedRunner::new().respond("ping", CommandOutput::ok("4 packets transmitted"));
        assert_eq!(Pinger::new(&missing, 1).measure_latency(), LATENCY_UNAVAILABLE);
    }
}
