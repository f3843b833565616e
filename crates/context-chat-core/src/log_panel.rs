use chrono::NaiveTime;

use crate::protocol::LogEntry;

pub const QUERY_PREVIEW_LIMIT: usize = 30;
pub const QUERY_PREVIEW_KEEP: usize = 27;
pub const QUERY_GROUP_ICON: &str = "🔍";
pub const DETAIL_HINT: &str = "📂 Click to view detail";

/// Header preview: the whole query, or its first 27 characters plus `...`
/// once it runs past 30 characters.
pub fn query_preview(query: &str) -> String {
    if query.chars().count() <= QUERY_PREVIEW_LIMIT {
        return query.to_string();
    }
    let mut preview: String = query.chars().take(QUERY_PREVIEW_KEEP).collect();
    preview.push_str("...");
    preview
}

pub fn query_group_title(query: &str) -> String {
    format!("{QUERY_GROUP_ICON} {}", query_preview(query))
}

pub fn modal_title(step: &str) -> String {
    format!("{step} Details")
}

/// Wall-clock time of day, rendered 24-hour `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    pub fn midnight() -> Self {
        Self(NaiveTime::MIN)
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

/// Everything a log row needs to be drawn, derived from one [`LogEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub timestamp: String,
    pub label: String,
    pub class_name: String,
    pub message: String,
    pub detail: Option<LogRowDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRowDetail {
    pub title: String,
    pub body: String,
}

impl LogRow {
    pub fn from_entry(entry: &LogEntry, at: ClockTime) -> Self {
        Self {
            timestamp: at.to_string(),
            label: entry.step.to_uppercase(),
            class_name: step_class(&entry.step),
            message: entry.message.clone(),
            detail: entry.detail_text().map(|body| LogRowDetail {
                title: modal_title(&entry.step),
                body: body.to_string(),
            }),
        }
    }

    pub fn header_text(&self) -> String {
        format!("[{}] {}", self.timestamp, self.label)
    }

    pub fn is_clickable(&self) -> bool {
        self.detail.is_some()
    }
}

/// Style classifier for a step. Whitespace would split the class list, so it
/// collapses to `-`.
pub fn step_class(step: &str) -> String {
    step.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupView {
    Expanded,
    Collapsed,
}

/// View state of one query's log group. Only the header click toggles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLogGroup {
    pub title: String,
    view: GroupView,
    rows: usize,
}

impl QueryLogGroup {
    pub fn new(query: &str) -> Self {
        Self {
            title: query_group_title(query),
            view: GroupView::Expanded,
            rows: 0,
        }
    }

    pub fn view(&self) -> GroupView {
        self.view
    }

    pub fn toggle(&mut self) -> GroupView {
        self.view = match self.view {
            GroupView::Expanded => GroupView::Collapsed,
            GroupView::Collapsed => GroupView::Expanded,
        };
        self.view
    }

    pub fn indicator(&self) -> &'static str {
        match self.view {
            GroupView::Expanded => "▼",
            GroupView::Collapsed => "▶",
        }
    }

    pub fn record_row(&mut self) -> usize {
        self.rows += 1;
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }
}
