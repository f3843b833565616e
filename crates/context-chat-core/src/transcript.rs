#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Class added next to `message` on the transcript row.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user-msg",
            Self::Assistant => "ai-msg",
        }
    }
}

/// Piece of a transcript message body. Text is always inserted as a text
/// node, never as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFragment {
    Text(String),
    LineBreak,
    ParagraphBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptMessage {
    pub role: MessageRole,
    pub fragments: Vec<MessageFragment>,
}

impl TranscriptMessage {
    pub fn new(text: &str, role: MessageRole) -> Self {
        Self {
            role,
            fragments: format_message(text),
        }
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                MessageFragment::Text(text) => out.push_str(text),
                MessageFragment::LineBreak => out.push('\n'),
                MessageFragment::ParagraphBreak => out.push_str("\n\n"),
            }
        }
        out
    }
}

/// Splits message text on line breaks. Double breaks are consumed first so
/// `"a\n\nb"` yields one paragraph break rather than two line breaks, and
/// `"\n\n\n"` yields a paragraph break followed by a line break.
pub fn format_message(text: &str) -> Vec<MessageFragment> {
    let mut fragments = Vec::new();
    for (paragraph_index, paragraph) in text.split("\n\n").enumerate() {
        if paragraph_index > 0 {
            fragments.push(MessageFragment::ParagraphBreak);
        }
        for (line_index, line) in paragraph.split('\n').enumerate() {
            if line_index > 0 {
                fragments.push(MessageFragment::LineBreak);
            }
            if !line.is_empty() {
                fragments.push(MessageFragment::Text(line.to_string()));
            }
        }
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> MessageFragment {
        MessageFragment::Text(value.to_string())
    }

    #[test]
    fn single_line_is_one_text_fragment() {
        assert_eq!(format_message("4"), vec![text("4")]);
    }

    #[test]
    fn double_break_becomes_paragraph_break() {
        assert_eq!(
            format_message("first\n\nsecond"),
            vec![text("first"), MessageFragment::ParagraphBreak, text("second")]
        );
    }

    #[test]
    fn single_break_becomes_line_break() {
        assert_eq!(
            format_message("a\nb\n\nc"),
            vec![
                text("a"),
                MessageFragment::LineBreak,
                text("b"),
                MessageFragment::ParagraphBreak,
                text("c"),
            ]
        );
    }

    #[test]
    fn triple_break_is_paragraph_then_line() {
        assert_eq!(
            format_message("a\n\n\nb"),
            vec![
                text("a"),
                MessageFragment::ParagraphBreak,
                MessageFragment::LineBreak,
                text("b"),
            ]
        );
    }

    #[test]
    fn markup_stays_literal_text() {
        let message = TranscriptMessage::new("<b>bold</b>", MessageRole::Assistant);
        assert_eq!(message.fragments, vec![text("<b>bold</b>")]);
        assert_eq!(message.plain_text(), "<b>bold</b>");
    }

    #[test]
    fn role_classes_follow_sender() {
        assert_eq!(MessageRole::User.css_class(), "user-msg");
        assert_eq!(MessageRole::Assistant.css_class(), "ai-msg");
    }
}
