//! 统一错误处理模块
//!
//! 定义了整个项目使用的错误类型。探测函数内部用 `?` 传播，
//! 在探测边界统一转换为占位文本。

use std::io;
use thiserror::Error;

/// netinfo 统一错误类型
#[derive(Error, Debug)]
pub enum NetInfoError {
    /// IO 相关错误
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    /// HTTP 请求错误
    #[error("HTTP错误: {0}")]
    Http(#[from] reqwest::Error),

    /// 外部命令执行失败
    #[error("命令执行失败 [{program}]: {message}")]
    Command { program: String, message: String },

    /// 输出解析失败
    #[error("解析失败 ({what}): {input}")]
    Parse { what: String, input: String },

    /// 不支持的操作
    #[error("不支持的操作: {operation}")]
    Unsupported { operation: String },
}

impl NetInfoError {
    /// 构造命令失败错误
    pub fn command(program: &str, message: impl Into<String>) -> Self {
        Self::Command {
            program: program.to_string(),
            message: message.into(),
        }
    }

    /// 构造解析失败错误
    pub fn parse(what: &str, input: impl Into<String>) -> Self {
        Self::Parse {
            what: what.to_string(),
            input: input.into(),
        }
    }
}

/// 项目统一的 Result 类型
pub type Result<T> = std::result::Result<T, NetInfoError>;
