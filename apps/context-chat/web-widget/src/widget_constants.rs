pub(crate) const CHAT_ROOT_ID: &str = "context-chat";
pub(crate) const CHAT_STYLE_ID: &str = "context-chat-style";
pub(crate) const CHAT_MESSAGES_ID: &str = "chat-messages";
pub(crate) const QUERY_FORM_ID: &str = "query-form";
pub(crate) const USER_INPUT_ID: &str = "user-input";
pub(crate) const SEND_BUTTON_ID: &str = "send-btn";
pub(crate) const LOG_LIST_ID: &str = "log-list";
pub(crate) const MODAL_OVERLAY_ID: &str = "modal-overlay";
pub(crate) const MODAL_TITLE_ID: &str = "modal-title";
pub(crate) const MODAL_CONTENT_ID: &str = "modal-content";
pub(crate) const MODAL_CLOSE_ID: &str = "close-modal";

pub(crate) const ELEMENT_IDS: [&str; 9] = [
    CHAT_MESSAGES_ID,
    QUERY_FORM_ID,
    USER_INPUT_ID,
    SEND_BUTTON_ID,
    LOG_LIST_ID,
    MODAL_OVERLAY_ID,
    MODAL_TITLE_ID,
    MODAL_CONTENT_ID,
    MODAL_CLOSE_ID,
];

pub(crate) const HIDDEN_CLASS: &str = "hidden";
pub(crate) const EMPTY_STATE_CLASS: &str = "empty-state";
pub(crate) const EMPTY_STATE_SELECTOR: &str = ".empty-state";
pub(crate) const MESSAGE_CLASS: &str = "message";
pub(crate) const MESSAGE_CONTENT_CLASS: &str = "msg-content";
pub(crate) const LOG_ENTRY_CLASS: &str = "log-entry";
pub(crate) const LOG_HEADER_CLASS: &str = "log-header";
pub(crate) const LOG_DETAIL_HINT_CLASS: &str = "log-detail-hint";
pub(crate) const LOG_CLICKABLE_CLASS: &str = "has-detail";
pub(crate) const QUERY_GROUP_CLASS: &str = "query-group";
pub(crate) const QUERY_GROUP_HEADER_CLASS: &str = "query-group-header";
pub(crate) const QUERY_GROUP_TITLE_CLASS: &str = "query-group-title";
pub(crate) const QUERY_GROUP_TOGGLE_CLASS: &str = "query-group-toggle";
pub(crate) const QUERY_GROUP_BODY_CLASS: &str = "query-group-body";
pub(crate) const COLLAPSED_CLASS: &str = "collapsed";

pub(crate) const CONFIG_GLOBAL: &str = "__CONTEXT_CHAT_CONFIG__";
pub(crate) const EMPTY_STATE_TEXT: &str = "Processing steps will appear here.";
pub(crate) const INPUT_PLACEHOLDER: &str = "Ask the context engine...";

/// Applied only when the widget had to create its own markup.
pub(crate) const BOOTSTRAP_CSS: &str = "\
.hidden { display: none !important; }
#modal-overlay { position: fixed; inset: 0; background: rgba(15, 23, 42, 0.6); display: flex; align-items: center; justify-content: center; }
#modal-overlay .modal { background: #0f172a; color: #e2e8f0; max-width: 720px; width: 90%; max-height: 80vh; overflow: auto; padding: 16px; border-radius: 10px; }
#modal-content { white-space: pre-wrap; font-family: ui-monospace, monospace; font-size: 12px; }
.query-group.collapsed .query-group-body { display: none; }
.query-group-header { cursor: pointer; }
.log-entry.has-detail { cursor: pointer; }
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn element_ids_are_unique() {
        let unique: HashSet<_> = ELEMENT_IDS.iter().collect();
        assert_eq!(unique.len(), ELEMENT_IDS.len());
        assert!(!ELEMENT_IDS.contains(&CHAT_ROOT_ID));
    }

    #[test]
    fn empty_state_selector_matches_class() {
        assert_eq!(EMPTY_STATE_SELECTOR, format!(".{EMPTY_STATE_CLASS}"));
    }

    #[test]
    fn bootstrap_css_hides_collapsed_bodies() {
        assert!(BOOTSTRAP_CSS.contains(&format!(".{HIDDEN_CLASS} ")));
        assert!(BOOTSTRAP_CSS.contains(&format!(
            ".{QUERY_GROUP_CLASS}.{COLLAPSED_CLASS} .{QUERY_GROUP_BODY_CLASS}"
        )));
    }
}
