//! 报告数据模型

use std::fmt;

/// 缺失值的显示文本
pub const NOT_AVAILABLE: &str = "Not available";

/// 单行探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub label: String,
    pub value: String,
}

impl ProbeResult {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// 按固定顺序排列的报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub rows: Vec<ProbeResult>,
}

impl Report {
    pub fn push(&mut self, row: ProbeResult) {
        self.rows.push(row);
    }

    /// 各行标签
    #[cfg(test)]
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    /// 按标签查找
    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 缺失值显示为 `Not available`
pub fn display_or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}
