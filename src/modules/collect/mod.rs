//! 本机信息收集模块
//!
//! 收集接口地址、网关、DNS、主机名等信息

pub mod dns;
pub mod network;
pub mod system;

pub use dns::DnsCollector;
pub use network::{NetworkCollector, NetworkSource, SystemNetwork};
pub use system::{collect_hostname, reverse_lookup};
