//! 颜色管理模块
//!
//! 提供终端颜色输出功能

use std::fmt::{self, Display};

/// 终端颜色枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    /// 获取 ANSI 颜色代码
    pub fn ansi_color_code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

/// 彩色文本结构
#[derive(Debug, Clone)]
pub struct ColoredText {
    text: String,
    color: Color,
    bold: bool,
    enabled: bool,
}

impl ColoredText {
    /// 创建新的彩色文本
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            bold: false,
            enabled: true,
        }
    }

    /// 设置粗体
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// 关闭颜色时按原文输出
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 渲染为 ANSI 字符串
    pub fn to_ansi(&self) -> String {
        if !self.enabled {
            return self.text.clone();
        }

        let mut result = format!("\x1b[{}m", self.color.ansi_color_code());

        if self.bold {
            result.push_str("\x1b[1m");
        }

        result.push_str(&self.text);
        result.push_str("\x1b[0m");

        result
    }
}

impl Display for ColoredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ansi())
    }
}

/// 打印成功消息
pub fn print_success(text: &str) {
    println!("{}", ColoredText::new(text, Color::Green));
}

/// 打印错误消息
pub fn print_error(text: &str) {
    eprintln!("{} {}", ColoredText::new("错误:", Color::Red).bold(), text);
}

/// 打印警告消息
pub fn print_warning(text: &str) {
    eprintln!(
        "{} {}",
        ColoredText::new("警告:", Color::Yellow).bold(),
        text
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_codes() {
        assert_eq!(Color::Red.ansi_color_code(), 31);
        assert_eq!(Color::Green.ansi_color_code(), 32);
        assert_eq!(Color::Blue.ansi_color_code(), 34);
    }

    #[test]
    fn test_colored_text_to_ansi() {
        let ansi = ColoredText::new("test", Color::Red).to_ansi();
        assert!(ansi.contains("\x1b[31m"));
        assert!(ansi.contains("test"));
        assert!(ansi.contains("\x1b[0m"));
    }

    #[test]
    fn test_bold_colored_text_to_ansi() {
        let ansi = ColoredText::new("test", Color::Blue).bold().to_ansi();
        assert!(ansi.contains("\x1b[34m"));
        assert!(ansi.contains("\x1b[1m"));
    }

    #[test]
    fn test_disabled_color_is_plain() {
        let text = ColoredText::new("Host Name: box", Color::Blue).bold().enabled(false);
        assert_eq!(text.to_string(), "Host Name: box");
    }
}
