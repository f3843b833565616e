/// Trimmed query, or `None` when there is nothing to send.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// What the input and send control should show. The browser controller
/// copies this onto the page after every change.
///
/// The composer only tracks what the controls show. It does not refuse a
/// second submission while one is in flight; programmatic submissions go
/// through regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerState {
    input_enabled: bool,
    send_enabled: bool,
    focus_input: bool,
}

impl Default for ComposerState {
    fn default() -> Self {
        Self {
            input_enabled: true,
            send_enabled: true,
            focus_input: false,
        }
    }
}

impl ComposerState {
    /// Marks a request as started; both controls go disabled.
    pub fn begin(&mut self) {
        self.input_enabled = false;
        self.send_enabled = false;
        self.focus_input = false;
    }

    /// Marks a request as settled. Controls come back and the input takes
    /// focus, even if an older request is still in flight. Idempotent.
    pub fn settle(&mut self) {
        self.input_enabled = true;
        self.send_enabled = true;
        self.focus_input = true;
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn focus_input(&self) -> bool {
        self.focus_input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_are_dropped() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   \n\t "), None);
    }

    #[test]
    fn queries_are_trimmed() {
        assert_eq!(
            normalize_query("  What is 2+2?\n").as_deref(),
            Some("What is 2+2?")
        );
    }

    #[test]
    fn controls_disable_while_in_flight_and_restore_on_settle() {
        let mut composer = ComposerState::default();
        assert!(composer.input_enabled() && composer.send_enabled());
        assert!(!composer.focus_input());

        composer.begin();
        assert!(!composer.input_enabled());
        assert!(!composer.send_enabled());
        assert!(!composer.focus_input());

        composer.settle();
        assert!(composer.input_enabled() && composer.send_enabled());
        assert!(composer.focus_input());
    }

    #[test]
    fn overlapping_submissions_restore_on_first_settle() {
        let mut composer = ComposerState::default();
        composer.begin();
        composer.begin();
        composer.settle();
        assert!(composer.input_enabled());
    }

    #[test]
    fn repeated_settle_is_harmless() {
        let mut composer = ComposerState::default();
        composer.begin();
        composer.settle();
        let settled = composer.clone();
        composer.settle();
        assert_eq!(composer, settled);
    }
}
