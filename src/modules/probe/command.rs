//! 外部命令执行
//!
//! ping、iwconfig 等命令统一经由 [`CommandRunner`] 调用，
//! 解析逻辑只依赖捕获的文本输出

use crate::core::{NetInfoError, Result};
use std::process::Command;
use tracing::{debug, trace};

/// 命令执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 进程是否以状态 0 退出
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// 成功退出的输出
    #[cfg(test)]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// 非零退出的输出
    #[cfg(test)]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// 非零退出视为错误
    pub fn checked(self, program: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(NetInfoError::command(program, self.stderr.trim()))
        }
    }
}

/// 外部命令执行器
pub trait CommandRunner {
    /// 执行命令并捕获输出，进程无法启动时返回错误
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// 基于 `std::process::Command` 的执行器
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!(program, ?args, "执行外部命令");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| NetInfoError::command(program, e.to_string()))?;

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!(program, status = ?output.status, stdout = %result.stdout, "命令结束");

        Ok(result)
    }
}

/// 测试用的脚本化执行器：按程序名返回预置输出，并记录每次调用
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: std::collections::HashMap<String, CommandOutput>,
    calls: std::cell::RefCell<Vec<(String, Vec<String>)>>,
}

#[cfg(test)]
impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为程序预置输出
    pub fn respond(mut self, program: &str, output: CommandOutput) -> Self {
        self.responses.insert(program.to_string(), output);
        self
    }

    /// 已记录的调用
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

#[cfg(test)]
impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));
        self.responses
            .get(program)
            .cloned()
            .ok_or_else(|| NetInfoError::command(program, "No such file or directory"))
    }
}
