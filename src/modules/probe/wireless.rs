//! 无线信号强度
//!
//! 解析 `iwconfig <iface>` 输出中的 `Signal level`

use super::capture_first;
use super::command::CommandRunner;
use tracing::debug;

/// 输出中没有信号强度
pub const SIGNAL_NOT_FOUND: &str = "Signal strength not found";

/// 不是无线接口，或接口不存在
pub const NOT_WIRELESS: &str = "Interface not wireless or not found";

const IWCONFIG_PROGRAM: &str = "iwconfig";

/// dBm 换算为近似百分比：`clamp(0, 100, 2 * (dBm + 100))`
pub fn signal_percent(dbm: i64) -> i64 {
    dbm.saturating_add(100).saturating_mul(2).clamp(0, 100)
}

/// 从 iwconfig 输出中提取 dBm 值
pub fn parse_signal_level(stdout: &str) -> Option<i64> {
    stdout
        .lines()
        .find(|line| line.contains("Signal level"))
        .and_then(|line| capture_first(r"Signal level[=:]\s*(-?[0-9]+)\s*dBm", line))
        .and_then(|dbm| dbm.parse().ok())
}

/// 格式化为 `"<dBm> dBm (<percent>%)"`
pub fn format_signal(dbm: i64) -> String {
    format!("{} dBm ({}%)", dbm, signal_percent(dbm))
}

/// 查询接口的无线信号强度
pub fn signal_strength(runner: &dyn CommandRunner, interface: Option<&str>) -> String {
    let Some(interface) = interface else {
        return NOT_WIRELESS.to_string();
    };

    let output = match runner
        .run(IWCONFIG_PROGRAM, &[interface.to_string()])
        .and_then(|o| o.checked(IWCONFIG_PROGRAM))
    {
        Ok(output) => output,
        Err(e) => {
            debug!(interface, error = %e, "iwconfig 查询失败");
            return NOT_WIRELESS.to_string();
        }
    };

    match parse_signal_level(&output.stdout) {
        Some(dbm) => format_signal(dbm),
        None => SIGNAL_NOT_FOUND.to_string(),
    }
}
