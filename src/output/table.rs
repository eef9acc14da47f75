//! 表格输出模块
//!
//! 将报告渲染为两列表格（Description / Details）

use crate::collector::models::Report;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::fmt;

/// 表格标题
pub const TABLE_TITLE: &str = "Network Information";

/// 报告表格
pub struct ReportTable {
    table: Table,
    use_colors: bool,
}

impl ReportTable {
    /// 创建新的报告表格
    pub fn new(use_colors: bool) -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Self::styled("Description", Color::Green, use_colors),
            Self::styled("Details", Color::Yellow, use_colors),
        ]);

        Self {
            table,
            use_colors,
        }
    }

    /// 由报告构建
    pub fn from_report(report: &Report, use_colors: bool) -> Self {
        let mut table = Self::new(use_colors);
        for row in &report.rows {
            table.add_row(&row.label, &row.value);
        }
        table
    }

    fn styled(text: &str, color: Color, use_colors: bool) -> Cell {
        let cell = Cell::new(text);
        if use_colors {
            cell.fg(color).add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }

    /// 添加一行
    pub fn add_row(&mut self, description: &str, details: &str) {
        self.table.add_row(vec![
            Self::styled(description, Color::Green, self.use_colors),
            Self::styled(details, Color::Yellow, self.use_colors),
        ]);
    }

    /// 标题 + 表格的纯文本
    pub fn render_text(&self) -> String {
        format!("{}\n{}", TABLE_TITLE, self.table)
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)
    }
}
