//! 输出模块
//!
//! 终端渲染：主机名、状态转轮、报告表格

pub mod color;
pub mod progress;
pub mod table;

pub use color::{print_error, print_success, print_warning, Color, ColoredText};
pub use progress::StatusSpinner;
pub use table::ReportTable;

use crate::collector::models::Report;
use crate::core::OutputConfig;
use table::TABLE_TITLE;

/// 终端报告输出器
pub struct Reporter {
    config: OutputConfig,
}

impl Reporter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// 探测期间使用的状态转轮
    pub fn spinner(&self) -> StatusSpinner {
        StatusSpinner::with_visibility(self.config.show_progress)
    }

    /// 打印表格前的主机名行
    pub fn print_host_name(&self, hostname: &str) {
        println!(
            "{}",
            ColoredText::new(format!("Host Name: {}", hostname), Color::Blue)
                .bold()
                .enabled(self.config.use_colors)
        );
    }

    /// 打印报告表格
    pub fn print_report(&self, report: &Report) {
        let table = ReportTable::from_report(report, self.config.use_colors);
        println!(
            "{}",
            ColoredText::new(TABLE_TITLE, Color::Blue)
                .bold()
                .enabled(self.config.use_colors)
        );
        println!("{}", table);
    }

    /// 写入日志文件的纯文本
    pub fn plain_text(report: &Report) -> String {
        ReportTable::from_report(report, false).render_text()
    }
}
