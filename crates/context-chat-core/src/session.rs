//! In-memory model of one chat page: transcript, log groups, composer and
//! modal. The browser controller mirrors every change here into the DOM.

use crate::composer::{ComposerState, normalize_query};
use crate::log_panel::{ClockTime, GroupView, LogRow, LogRowDetail, QueryLogGroup};
use crate::protocol::{AskFailure, AskResponse, LogEntry};
use crate::schedule::StaggerPlan;
use crate::transcript::{MessageRole, TranscriptMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub usize);

/// A query accepted for sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub group: GroupId,
    pub query: String,
}

/// What the caller has to do once a request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Schedule every step of `plan` against `response`.
    Answered {
        group: GroupId,
        response: AskResponse,
        plan: StaggerPlan,
    },
    /// `message` has already been appended to the transcript.
    Failed { message: TranscriptMessage },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub visible: bool,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Vec<TranscriptMessage>,
    groups: Vec<QueryLogGroup>,
    rows: Vec<(GroupId, LogRow)>,
    composer: ComposerState,
    modal: ModalState,
    empty_state_visible: bool,
    stagger_ms: u32,
}

impl ChatSession {
    pub fn new(stagger_ms: u32) -> Self {
        Self {
            transcript: Vec::new(),
            groups: Vec::new(),
            rows: Vec::new(),
            composer: ComposerState::default(),
            modal: ModalState::default(),
            empty_state_visible: true,
            stagger_ms,
        }
    }

    /// Accepts a raw query. Blank input changes nothing and returns `None`;
    /// otherwise the user message and a fresh expanded group are added and the
    /// controls go disabled until [`ChatSession::settle`].
    pub fn submit(&mut self, raw: &str) -> Option<Submission> {
        let query = normalize_query(raw)?;
        self.composer.begin();
        self.append_message(&query, MessageRole::User);
        let group = GroupId(self.groups.len());
        self.groups.push(QueryLogGroup::new(&query));
        Some(Submission { group, query })
    }

    pub fn settle(
        &mut self,
        group: GroupId,
        result: Result<AskResponse, AskFailure>,
    ) -> Settlement {
        self.composer.settle();
        match result {
            Ok(response) => {
                let plan = StaggerPlan::new(response.logs.len(), self.stagger_ms);
                Settlement::Answered {
                    group,
                    response,
                    plan,
                }
            }
            Err(failure) => {
                let message = self
                    .append_message(&failure.to_string(), MessageRole::Assistant)
                    .clone();
                Settlement::Failed { message }
            }
        }
    }

    /// Brings the controls back without a settlement, for exit paths that
    /// never reached [`ChatSession::settle`].
    pub fn restore_controls(&mut self) {
        self.composer.settle();
    }

    pub fn append_message(&mut self, text: &str, role: MessageRole) -> &TranscriptMessage {
        self.transcript.push(TranscriptMessage::new(text, role));
        let last = self.transcript.len() - 1;
        &self.transcript[last]
    }

    /// Adds a log row to `group`. Returns `None` for an unknown group.
    pub fn record_log(&mut self, group: GroupId, entry: &LogEntry, at: ClockTime) -> Option<&LogRow> {
        let target = self.groups.get_mut(group.0)?;
        target.record_row();
        self.empty_state_visible = false;
        self.rows.push((group, LogRow::from_entry(entry, at)));
        self.rows.last().map(|(_, row)| row)
    }

    pub fn toggle_group(&mut self, group: GroupId) -> Option<GroupView> {
        self.groups.get_mut(group.0).map(QueryLogGroup::toggle)
    }

    pub fn show_modal(&mut self, detail: &LogRowDetail) {
        self.modal = ModalState {
            visible: true,
            title: detail.title.clone(),
            body: detail.body.clone(),
        };
    }

    pub fn hide_modal(&mut self) {
        self.modal.visible = false;
    }

    pub fn transcript(&self) -> &[TranscriptMessage] {
        &self.transcript
    }

    pub fn group(&self, group: GroupId) -> Option<&QueryLogGroup> {
        self.groups.get(group.0)
    }

    pub fn rows_in(&self, group: GroupId) -> impl Iterator<Item = &LogRow> {
        self.rows
            .iter()
            .filter(move |(owner, _)| *owner == group)
            .map(|(_, row)| row)
    }

    pub fn composer(&self) -> &ComposerState {
        &self.composer
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn empty_state_visible(&self) -> bool {
        self.empty_state_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::RenderStep;

    fn clock() -> ClockTime {
        ClockTime::from_hms(12, 0, 0).unwrap_or_else(ClockTime::midnight)
    }

    fn arithmetic_response() -> AskResponse {
        serde_json::from_value(serde_json::json!({
            "answer": "4",
            "logs": [
                {"step": "plan", "message": "Parsed arithmetic"},
                {"step": "compute", "message": "Evaluated", "detail": "2+2=4"}
            ]
        }))
        .unwrap_or(AskResponse {
            answer: String::new(),
            logs: Vec::new(),
        })
    }

    /// Plays every scheduled step in fire order, the way independent timers
    /// would.
    fn run_plan(session: &mut ChatSession, settlement: Settlement) {
        let Settlement::Answered {
            group,
            response,
            plan,
        } = settlement
        else {
            return;
        };
        let mut steps: Vec<_> = plan.into_iter().collect();
        steps.sort_by_key(|scheduled| scheduled.delay_ms);
        for scheduled in steps {
            match scheduled.step {
                RenderStep::LogEntry { index } => {
                    session.record_log(group, &response.logs[index], clock());
                }
                RenderStep::Answer => {
                    session.append_message(&response.answer, MessageRole::Assistant);
                }
            }
        }
    }

    #[test]
    fn blank_submission_changes_nothing() {
        let mut session = ChatSession::new(400);
        assert_eq!(session.submit("   "), None);
        assert!(session.transcript().is_empty());
        assert!(session.group(GroupId(0)).is_none());
        assert!(session.composer().input_enabled());
    }

    #[test]
    fn answered_query_renders_rows_in_order_then_answer() {
        let mut session = ChatSession::new(400);
        let submission = session.submit("  What is 2+2? ");
        let Some(submission) = submission else {
            unreachable!("query is not blank");
        };
        assert_eq!(submission.query, "What is 2+2?");
        assert!(!session.composer().input_enabled());

        let group = session.group(submission.group).map(|group| group.title.clone());
        assert_eq!(group.as_deref(), Some("🔍 What is 2+2?"));

        let settlement = session.settle(submission.group, Ok(arithmetic_response()));
        assert!(session.composer().input_enabled());
        assert!(session.composer().send_enabled());
        run_plan(&mut session, settlement);

        let labels: Vec<_> = session
            .rows_in(submission.group)
            .map(|row| (row.label.clone(), row.is_clickable()))
            .collect();
        assert_eq!(
            labels,
            vec![("PLAN".to_string(), false), ("COMPUTE".to_string(), true)]
        );
        assert!(!session.empty_state_visible());

        let transcript: Vec<_> = session
            .transcript()
            .iter()
            .map(|message| (message.role, message.plain_text()))
            .collect();
        assert_eq!(
            transcript,
            vec![
                (MessageRole::User, "What is 2+2?".to_string()),
                (MessageRole::Assistant, "4".to_string()),
            ]
        );
    }

    #[test]
    fn clicking_detail_row_fills_modal_without_touching_group() {
        let mut session = ChatSession::new(400);
        let Some(submission) = session.submit("What is 2+2?") else {
            unreachable!("query is not blank");
        };
        let settlement = session.settle(submission.group, Ok(arithmetic_response()));
        run_plan(&mut session, settlement);

        let detail = session
            .rows_in(submission.group)
            .find_map(|row| row.detail.clone());
        let Some(detail) = detail else {
            unreachable!("compute row carries detail");
        };
        session.show_modal(&detail);
        assert_eq!(
            session.modal(),
            &ModalState {
                visible: true,
                title: "compute Details".to_string(),
                body: "2+2=4".to_string(),
            }
        );
        assert_eq!(
            session.group(submission.group).map(QueryLogGroup::view),
            Some(GroupView::Expanded)
        );

        session.hide_modal();
        assert!(!session.modal().visible);
    }

    #[test]
    fn application_failure_leaves_empty_group_and_error_message() {
        let mut session = ChatSession::new(400);
        let Some(submission) = session.submit("bad") else {
            unreachable!("query is not blank");
        };
        let settlement = session.settle(
            submission.group,
            Err(AskFailure::Application {
                status: 422,
                detail: "bad input".to_string(),
            }),
        );

        let Settlement::Failed { message } = settlement else {
            unreachable!("failure must not schedule renders");
        };
        assert_eq!(message.plain_text(), "Error: bad input");
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(session.rows_in(submission.group).count(), 0);
        assert!(session.empty_state_visible());
        assert_eq!(session.toggle_group(submission.group), Some(GroupView::Collapsed));
        assert!(session.composer().input_enabled());
    }

    #[test]
    fn transport_failure_is_prefixed_critical() {
        let mut session = ChatSession::new(400);
        let Some(submission) = session.submit("q") else {
            unreachable!("query is not blank");
        };
        session.settle(
            submission.group,
            Err(AskFailure::transport("Failed to fetch")),
        );
        let last = session.transcript().last().map(TranscriptMessage::plain_text);
        assert_eq!(last.as_deref(), Some("Critical Error: Failed to fetch"));
    }

    #[test]
    fn overlapping_queries_keep_rows_in_their_own_groups() {
        let mut session = ChatSession::new(400);
        let (Some(first), Some(second)) = (session.submit("first"), session.submit("second"))
        else {
            unreachable!("queries are not blank");
        };
        let second_settlement = session.settle(second.group, Ok(arithmetic_response()));
        let first_settlement = session.settle(first.group, Ok(arithmetic_response()));
        run_plan(&mut session, second_settlement);
        run_plan(&mut session, first_settlement);

        assert_eq!(session.rows_in(first.group).count(), 2);
        assert_eq!(session.rows_in(second.group).count(), 2);
        assert_eq!(session.group(first.group).map(QueryLogGroup::row_count), Some(2));
    }

    #[test]
    fn controls_come_back_focused_on_every_exit_path() {
        let mut session = ChatSession::new(400);
        let Some(answered) = session.submit("ok") else {
            unreachable!("query is not blank");
        };
        assert!(!session.composer().input_enabled());
        assert!(!session.composer().send_enabled());
        session.settle(answered.group, Ok(arithmetic_response()));
        assert!(session.composer().input_enabled() && session.composer().focus_input());

        let Some(failed) = session.submit("bad") else {
            unreachable!("query is not blank");
        };
        session.settle(failed.group, Err(AskFailure::transport("offline")));
        assert!(session.composer().send_enabled() && session.composer().focus_input());

        session.submit("abandoned");
        session.restore_controls();
        assert!(session.composer().input_enabled());
        assert!(session.composer().send_enabled());
        assert!(session.composer().focus_input());
    }

    #[test]
    fn unknown_group_is_ignored() {
        let mut session = ChatSession::new(400);
        let entry = LogEntry {
            step: "plan".to_string(),
            message: "orphan".to_string(),
            detail: None,
        };
        assert!(session.record_log(GroupId(3), &entry, clock()).is_none());
        assert!(session.empty_state_visible());
        assert_eq!(session.toggle_group(GroupId(3)), None);
    }
}
