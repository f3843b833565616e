//! Browser-independent core of the context engine chat widget.
//!
//! Everything here compiles and tests natively; the wasm crate only maps
//! these models onto the DOM.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod composer;
pub mod config;
pub mod log_panel;
pub mod protocol;
pub mod schedule;
pub mod session;
pub mod transcript;

pub use composer::{ComposerState, normalize_query};
pub use config::{ConfigError, ConfigOverrides, LogLevel, WidgetConfig};
pub use log_panel::{ClockTime, GroupView, LogRow, LogRowDetail, QueryLogGroup};
pub use protocol::{AskFailure, AskRequest, AskResponse, LogEntry};
pub use schedule::{RenderStep, ScheduledRender, StaggerPlan};
pub use session::{ChatSession, GroupId, Settlement, Submission};
pub use transcript::{MessageFragment, MessageRole, TranscriptMessage};
