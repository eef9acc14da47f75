//! 进度显示模块
//!
//! 探测过程中的状态转轮

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 探测状态转轮
pub struct StatusSpinner {
    bar: ProgressBar,
}

impl StatusSpinner {
    /// 创建新的状态转轮
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg:.green.bold}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// 隐藏转轮（静默模式）
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// 根据配置创建
    pub fn with_visibility(show: bool) -> Self {
        if show {
            Self::new()
        } else {
            Self::hidden()
        }
    }

    /// 设置当前状态
    pub fn set_status(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// 当前状态
    #[cfg(test)]
    pub fn status(&self) -> String {
        self.bar.message()
    }

    /// 完成并清除转轮
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for StatusSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StatusSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
