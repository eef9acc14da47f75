//! 网络配置收集模块
//!
//! 收集网络接口地址、默认网关、MAC 地址等本机网络信息。
//!
//! "第一个非回环接口" 按操作系统报告的接口顺序选取，不做额外排序；
//! 各探测项独立重新枚举，接口状态在两次查询之间变化时结果可能不一致。

use crate::core::{NetInfoError, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::process::Command;
use tracing::debug;

/// 按名称跳过的回环接口
const LOOPBACK_NAMES: &[&str] = &["lo", "lo0"];

/// 地址族
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrFamily {
    V4,
    V6,
}

/// 接口上的单个地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceAddr {
    V4 {
        ip: Ipv4Addr,
        netmask: Ipv4Addr,
        broadcast: Option<Ipv4Addr>,
    },
    /// 文本形式，可能带 `%zone` 后缀
    V6 { address: String },
}

/// 接口地址条目（一个接口可对应多条）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub name: String,
    pub addr: InterfaceAddr,
}

/// IPv4 绑定信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Binding {
    pub interface: String,
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub broadcast: Option<Ipv4Addr>,
}

/// IPv6 绑定信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Binding {
    pub interface: String,
    /// 已去除 zone 后缀
    pub address: String,
}

/// 探测值及其所属接口，两者都可能缺失
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceValue {
    pub value: Option<String>,
    pub interface: Option<String>,
}

/// 本机网络状态来源
pub trait NetworkSource {
    /// 按系统顺序列出所有接口地址
    fn addresses(&self) -> Result<Vec<InterfaceAddress>>;

    /// 指定地址族的默认网关
    fn default_gateway(&self, family: AddrFamily) -> Result<Option<IpAddr>>;

    /// 接口的链路层地址
    fn mac_address(&self, interface: &str) -> Result<Option<String>>;
}

/// 是否为回环接口
pub fn is_loopback_name(name: &str) -> bool {
    LOOPBACK_NAMES.contains(&name)
}

/// 去掉 IPv6 地址的 zone 后缀（`%` 之后的内容）
pub fn strip_zone_index(address: &str) -> &str {
    address.split('%').next().unwrap_or(address)
}

/// 第一个带 IPv4 地址的非回环接口
pub fn select_ipv4(addrs: &[InterfaceAddress]) -> Option<Ipv4Binding> {
    addrs
        .iter()
        .filter(|entry| !is_loopback_name(&entry.name))
        .find_map(|entry| match &entry.addr {
            InterfaceAddr::V4 {
                ip,
                netmask,
                broadcast,
            } => Some(Ipv4Binding {
                interface: entry.name.clone(),
                address: *ip,
                netmask: *netmask,
                broadcast: *broadcast,
            }),
            InterfaceAddr::V6 { .. } => None,
        })
}

/// 第一个带 IPv6 地址的非回环接口
pub fn select_ipv6(addrs: &[InterfaceAddress]) -> Option<Ipv6Binding> {
    addrs
        .iter()
        .filter(|entry| !is_loopback_name(&entry.name))
        .find_map(|entry| match &entry.addr {
            InterfaceAddr::V6 { address } => Some(Ipv6Binding {
                interface: entry.name.clone(),
                address: strip_zone_index(address).to_string(),
            }),
            InterfaceAddr::V4 { .. } => None,
        })
}

/// 网络信息收集器
pub struct NetworkCollector<'a> {
    source: &'a dyn NetworkSource,
}

impl<'a> NetworkCollector<'a> {
    /// 创建新的网络信息收集器
    pub fn new(source: &'a dyn NetworkSource) -> Self {
        Self { source }
    }

    fn addresses(&self) -> Vec<InterfaceAddress> {
        match self.source.addresses() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(error = %e, "枚举接口地址失败");
                Vec::new()
            }
        }
    }

    fn ipv4_binding(&self) -> Option<Ipv4Binding> {
        select_ipv4(&self.addresses())
    }

    /// 本机 IPv4 地址及接口名
    pub fn local_ipv4(&self) -> InterfaceValue {
        self.ipv4_binding()
            .map(|b| InterfaceValue {
                value: Some(b.address.to_string()),
                interface: Some(b.interface),
            })
            .unwrap_or_default()
    }

    /// 子网掩码及接口名
    pub fn subnet_mask(&self) -> InterfaceValue {
        self.ipv4_binding()
            .map(|b| InterfaceValue {
                value: Some(b.netmask.to_string()),
                interface: Some(b.interface),
            })
            .unwrap_or_default()
    }

    /// 广播地址及接口名，接口存在时广播地址仍可能缺失
    pub fn broadcast_address(&self) -> InterfaceValue {
        self.ipv4_binding()
            .map(|b| InterfaceValue {
                value: b.broadcast.map(|addr| addr.to_string()),
                interface: Some(b.interface),
            })
            .unwrap_or_default()
    }

    /// IPv6 地址（已去除 zone）及接口名
    pub fn ipv6_address(&self) -> InterfaceValue {
        select_ipv6(&self.addresses())
            .map(|b| InterfaceValue {
                value: Some(b.address),
                interface: Some(b.interface),
            })
            .unwrap_or_default()
    }

    /// 指定接口的 MAC 地址
    pub fn mac_address(&self, interface: &str) -> Option<String> {
        match self.source.mac_address(interface) {
            Ok(mac) => mac,
            Err(e) => {
                debug!(interface, error = %e, "获取 MAC 地址失败");
                None
            }
        }
    }

    fn gateway(&self, family: AddrFamily) -> Option<String> {
        match self.source.default_gateway(family) {
            Ok(gateway) => gateway.map(|ip| ip.to_string()),
            Err(e) => {
                debug!(?family, error = %e, "读取默认路由失败");
                None
            }
        }
    }

    /// IPv4 默认网关
    pub fn gateway_ipv4(&self) -> Option<String> {
        self.gateway(AddrFamily::V4)
    }

    /// IPv6 默认网关
    pub fn gateway_ipv6(&self) -> Option<String> {
        self.gateway(AddrFamily::V6)
    }
}

/// 操作系统网络状态
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNetwork;

impl NetworkSource for SystemNetwork {
    fn addresses(&self) -> Result<Vec<InterfaceAddress>> {
        let interfaces = if_addrs::get_if_addrs()?;

        Ok(interfaces
            .into_iter()
            .map(|iface| {
                let addr = match iface.addr {
                    if_addrs::IfAddr::V4(v4) => InterfaceAddr::V4 {
                        ip: v4.ip,
                        netmask: v4.netmask,
                        broadcast: v4.broadcast,
                    },
                    if_addrs::IfAddr::V6(v6) => InterfaceAddr::V6 {
                        address: v6.ip.to_string(),
                    },
                };
                InterfaceAddress {
                    name: iface.name,
                    addr,
                }
            })
            .collect())
    }

    fn default_gateway(&self, family: AddrFamily) -> Result<Option<IpAddr>> {
        if cfg!(target_os = "linux") {
            match family {
                AddrFamily::V4 => {
                    let content = std::fs::read_to_string("/proc/net/route")?;
                    Ok(parse_proc_route(&content).map(IpAddr::V4))
                }
                AddrFamily::V6 => {
                    let content = std::fs::read_to_string("/proc/net/ipv6_route")?;
                    Ok(parse_proc_ipv6_route(&content).map(IpAddr::V6))
                }
            }
        } else if cfg!(unix) {
            let output = Command::new("netstat").arg("-rn").output()?;
            if !output.status.success() {
                return Err(NetInfoError::command(
                    "netstat",
                    String::from_utf8_lossy(&output.stderr).trim(),
                ));
            }
            let content = String::from_utf8_lossy(&output.stdout);
            Ok(parse_netstat_default(&content, family))
        } else {
            Err(NetInfoError::Unsupported {
                operation: "读取默认路由".to_string(),
            })
        }
    }

    fn mac_address(&self, interface: &str) -> Result<Option<String>> {
        if cfg!(target_os = "linux") {
            // /sys/class/net/<iface>/address
            let path = format!("/sys/class/net/{}/address", interface);
            let content = std::fs::read_to_string(&path)?;
            Ok(normalize_mac(content.trim()))
        } else if cfg!(unix) {
            let output = Command::new("ifconfig").arg(interface).output()?;
            if !output.status.success() {
                return Ok(None);
            }
            let content = String::from_utf8_lossy(&output.stdout);
            Ok(parse_ifconfig_ether(&content))
        } else {
            Err(NetInfoError::Unsupported {
                operation: "读取 MAC 地址".to_string(),
            })
        }
    }
}

// ==================== 辅助函数 ====================

/// 将 /proc/net/route 中的小端十六进制转换为 IPv4 地址
fn hex_to_ipv4(hex: &str) -> Option<Ipv4Addr> {
    let num = u32::from_str_radix(hex, 16).ok()?;
    Some(Ipv4Addr::from(num.swap_bytes()))
}

/// 将 /proc/net/ipv6_route 中的 32 位十六进制转换为 IPv6 地址
fn hex_to_ipv6(hex: &str) -> Option<Ipv6Addr> {
    if hex.len() != 32 {
        return None;
    }
    u128::from_str_radix(hex, 16).ok().map(Ipv6Addr::from)
}

/// 解析 /proc/net/route，返回第一条默认路由的网关
fn parse_proc_route(content: &str) -> Option<Ipv4Addr> {
    // Iface Destination Gateway Flags RefCnt Use Metric Mask ...
    content.lines().skip(1).find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 8 || parts[1] != "00000000" || parts[7] != "00000000" {
            return None;
        }
        hex_to_ipv4(parts[2]).filter(|gw| !gw.is_unspecified())
    })
}

/// 解析 /proc/net/ipv6_route，返回第一条默认路由的下一跳
fn parse_proc_ipv6_route(content: &str) -> Option<Ipv6Addr> {
    // dest dest_plen src src_plen next_hop metric refcnt use flags iface
    content.lines().find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 || parts[1] != "00" {
            return None;
        }
        let dest = hex_to_ipv6(parts[0])?;
        if !dest.is_unspecified() {
            return None;
        }
        hex_to_ipv6(parts[4]).filter(|hop| !hop.is_unspecified())
    })
}

/// 解析 `netstat -rn` 中的 default 路由
fn parse_netstat_default(content: &str, family: AddrFamily) -> Option<IpAddr> {
    content.lines().find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 || parts[0] != "default" {
            return None;
        }
        let gateway: IpAddr = strip_zone_index(parts[1]).parse().ok()?;
        match (family, gateway) {
            (AddrFamily::V4, IpAddr::V4(_)) | (AddrFamily::V6, IpAddr::V6(_)) => Some(gateway),
            _ => None,
        }
    })
}

/// 解析 `ifconfig <iface>` 中的 ether 行
fn parse_ifconfig_ether(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim();
        let mac = line.strip_prefix("ether ")?.split_whitespace().next()?;
        normalize_mac(mac)
    })
}

/// 空值和全零 MAC 视为缺失
fn normalize_mac(mac: &str) -> Option<String> {
    let mac = mac.trim().to_lowercase();
    if mac.is_empty() || mac.chars().all(|c| c == '0' || c == ':') {
        None
    } else {
        Some(mac)
    }
}

/// 测试用的固定网络状态
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct StaticNetwork {
    pub addrs: Vec<InterfaceAddress>,
    pub gateway_v4: Option<IpAddr>,
    pub gateway_v6: Option<IpAddr>,
    pub macs: Vec<(String, String)>,
    pub broken: bool,
}

#[cfg(test)]
impl StaticNetwork {
    pub fn v4(name: &str, ip: [u8; 4], mask: [u8; 4], broadcast: Option<[u8; 4]>) -> InterfaceAddress {
        InterfaceAddress {
            name: name.to_string(),
            addr: InterfaceAddr::V4 {
                ip: Ipv4Addr::from(ip),
                netmask: Ipv4Addr::from(mask),
                broadcast: broadcast.map(Ipv4Addr::from),
            },
        }
    }

    pub fn v6(name: &str, address: &str) -> InterfaceAddress {
        InterfaceAddress {
            name: name.to_string(),
            addr: InterfaceAddr::V6 {
                address: address.to_string(),
            },
        }
    }

    /// 典型的家用主机：lo + eth0
    pub fn home() -> Self {
        Self {
            addrs: vec![
                Self::v4("lo", [127, 0, 0, 1], [255, 0, 0, 0], None),
                Self::v6("lo", "::1"),
                Self::v4("eth0", [192, 168, 1, 23], [255, 255, 255, 0], Some([192, 168, 1, 255])),
                Self::v6("eth0", "fe80::1%eth0"),
            ],
            gateway_v4: Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))),
            gateway_v6: Some(IpAddr::V6("fe80::abcd".parse().unwrap_or(Ipv6Addr::UNSPECIFIED))),
            macs: vec![("eth0".to_string(), "aa:bb:cc:dd:ee:ff".to_string())],
            broken: false,
        }
    }
}

#[cfg(test)]
impl NetworkSource for StaticNetwork {
    fn addresses(&self) -> Result<Vec<InterfaceAddress>> {
        if self.broken {
            return Err(NetInfoError::Unsupported {
                operation: "枚举接口".to_string(),
            });
        }
        Ok(self.addrs.clone())
    }

    fn default_gateway(&self, family: AddrFamily) -> Result<Option<IpAddr>> {
        if self.broken {
            return Err(NetInfoError::Unsupported {
                operation: "读取默认路由".to_string(),
            });
        }
        Ok(match family {
            AddrFamily::V4 => self.gateway_v4,
            AddrFamily::V6 => self.gateway_v6,
        })
    }

    fn mac_address(&self, interface: &str) -> Result<Option<String>> {
        Ok(self
            .macs
            .iter()
            .find(|(name, _)| name == interface)
            .map(|(_, mac)| mac.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_ROUTE: &str = "Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
wlan0\t00000000\t0101A8C0\t0003\t0\t0\t600\t00000000\t0\t0\t0
wlan0\t0001A8C0\t00000000\t0001\t0\t0\t600\t00FFFFFF\t0\t0\t0
";

    const PROC_IPV6_ROUTE: &str = "fe800000000000000000000000000000 40 00000000000000000000000000000000 00 00000000000000000000000000000000 00000100 00000001 00000000 00000001 wlan0
00000000000000000000000000000000 00 00000000000000000000000000000000 00 fe80000000000000021122fffe334455 00000400 00000001 00000000 00000003 wlan0
";

    const NETSTAT_RN: &str = "Routing tables

Internet:
Destination        Gateway            Flags           Netif Expire
default            192.168.0.1        UGScg             en0
127                127.0.0.1          UCS               lo0

Internet6:
Destination                             Gateway                                 Flags           Netif Expire
default                                 fe80::1%en0                             UGcg              en0
";

    const IFCONFIG_EN0: &str = "en0: flags=8863<UP,BROADCAST,SMART,RUNNING,SIMPLEX,MULTICAST> mtu 1500
\toptions=6463<RXCSUM,TXCSUM,TSO4,TSO6,CHANNEL_IO,PARTIAL_CSUM,ZEROINVERT_CSUM>
\tether 3c:22:fb:01:02:03
\tinet 192.168.0.12 netmask 0xffffff00 broadcast 192.168.0.255
";

    #[test]
    fn test_hex_to_ipv4() {
        assert_eq!(hex_to_ipv4("0100007F"), Some(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(hex_to_ipv4("0000A8C0"), Some(Ipv4Addr::new(192, 168, 0, 0)));
        assert_eq!(hex_to_ipv4("zz"), None);
    }

    #[test]
    fn test_parse_proc_route() {
        assert_eq!(parse_proc_route(PROC_ROUTE), Some(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(parse_proc_route("Iface\tDestination\n"), None);
    }

    #[test]
    fn test_parse_proc_ipv6_route() {
        let expected: Ipv6Addr = "fe80::211:22ff:fe33:4455".parse().unwrap();
        assert_eq!(parse_proc_ipv6_route(PROC_IPV6_ROUTE), Some(expected));
        assert_eq!(parse_proc_ipv6_route(""), None);
    }

    #[test]
    fn test_parse_netstat_default() {
        assert_eq!(
            parse_netstat_default(NETSTAT_RN, AddrFamily::V4),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1)))
        );
        assert_eq!(
            parse_netstat_default(NETSTAT_RN, AddrFamily::V6),
            Some("fe80::1".parse().unwrap())
        );
    }

    #[test]
    fn test_parse_ifconfig_ether() {
        assert_eq!(parse_ifconfig_ether(IFCONFIG_EN0), Some("3c:22:fb:01:02:03".to_string()));
        assert_eq!(parse_ifconfig_ether("lo0: flags=8049<UP,LOOPBACK>"), None);
    }

    #[test]
    fn test_normalize_mac() {
        assert_eq!(normalize_mac("AA:BB:CC:00:11:22\n"), Some("aa:bb:cc:00:11:22".to_string()));
        assert_eq!(normalize_mac("00:00:00:00:00:00"), None);
        assert_eq!(normalize_mac(""), None);
    }

    #[test]
    fn test_strip_zone_index() {
        assert_eq!(strip_zone_index("fe80::1%eth0"), "fe80::1");
        assert_eq!(strip_zone_index("2001:db8::5"), "2001:db8::5");
    }

    #[test]
    fn test_select_skips_loopback() {
        let net = StaticNetwork::home();
        let v4 = select_ipv4(&net.addrs).unwrap();
        assert_eq!(v4.interface, "eth0");
        assert_eq!(v4.address, Ipv4Addr::new(192, 168, 1, 23));

        let v6 = select_ipv6(&net.addrs).unwrap();
        assert_eq!(v6.interface, "eth0");
        assert_eq!(v6.address, "fe80::1");
    }

    #[test]
    fn test_select_follows_os_order() {
        let addrs = vec![
            StaticNetwork::v6("wlan0", "2001:db8::2"),
            StaticNetwork::v4("docker0", [172, 17, 0, 1], [255, 255, 0, 0], Some([172, 17, 255, 255])),
            StaticNetwork::v4("wlan0", [10, 0, 0, 5], [255, 0, 0, 0], None),
        ];
        assert_eq!(select_ipv4(&addrs).unwrap().interface, "docker0");
        assert_eq!(select_ipv6(&addrs).unwrap().interface, "wlan0");
    }

    #[test]
    fn test_select_only_loopback() {
        let addrs = vec![
            StaticNetwork::v4("lo", [127, 0, 0, 1], [255, 0, 0, 0], None),
            StaticNetwork::v6("lo", "::1"),
        ];
        assert!(select_ipv4(&addrs).is_none());
        assert!(select_ipv6(&addrs).is_none());
    }

    #[test]
    fn test_collector_probes() {
        let net = StaticNetwork::home();
        let collector = NetworkCollector::new(&net);

        assert_eq!(
            collector.local_ipv4(),
            InterfaceValue {
                value: Some("192.168.1.23".to_string()),
                interface: Some("eth0".to_string()),
            }
        );
        assert_eq!(collector.subnet_mask().value.as_deref(), Some("255.255.255.0"));
        assert_eq!(collector.broadcast_address().value.as_deref(), Some("192.168.1.255"));
        assert_eq!(collector.ipv6_address().value.as_deref(), Some("fe80::1"));
        assert_eq!(collector.mac_address("eth0").as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(collector.mac_address("wlan9"), None);
        assert_eq!(collector.gateway_ipv4().as_deref(), Some("192.168.1.1"));
        assert_eq!(collector.gateway_ipv6().as_deref(), Some("fe80::abcd"));
    }

    #[test]
    fn test_broadcast_may_be_absent() {
        let net = StaticNetwork {
            addrs: vec![StaticNetwork::v4("tun0", [10, 8, 0, 2], [255, 255, 255, 255], None)],
            ..Default::default()
        };
        let broadcast = NetworkCollector::new(&net).broadcast_address();
        assert_eq!(broadcast.value, None);
        assert_eq!(broadcast.interface.as_deref(), Some("tun0"));
    }

    #[test]
    fn test_broken_source_yields_absent() {
        let net = StaticNetwork {
            broken: true,
            ..StaticNetwork::home()
        };
        let collector = NetworkCollector::new(&net);
        assert_eq!(collector.local_ipv4(), InterfaceValue::default());
        assert_eq!(collector.gateway_ipv4(), None);
    }

    #[test]
    fn test_system_network_does_not_panic() {
        let collector = NetworkCollector::new(&SystemNetwork);
        let _ = collector.local_ipv4();
        let _ = collector.gateway_ipv4();
        let _ = collector.gateway_ipv6();
    }
}
