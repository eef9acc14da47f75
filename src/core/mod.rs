//! 核心功能模块
//!
//! 包含错误处理、配置管理等核心基础设施

pub mod config;
pub mod error;

pub use config::{Config, OutputConfig, ProbeSelection};
pub use error::{NetInfoError, Result};
