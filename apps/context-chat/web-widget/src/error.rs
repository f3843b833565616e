#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum WidgetError {
    #[error("window is unavailable")]
    WindowUnavailable,
    #[error("document is unavailable")]
    DocumentUnavailable,
    #[error("document body is unavailable")]
    BodyUnavailable,
    #[error("failed to create <{tag}> for #{id}")]
    CreateFailed { tag: &'static str, id: String },
    #[error("#{id} exists but is not {expected}")]
    WrongElementType { id: String, expected: &'static str },
    #[error("failed to append #{id}")]
    AppendFailed { id: String },
    #[error("failed to attach `{event}` listener to {target}")]
    ListenerFailed {
        event: &'static str,
        target: String,
    },
}

#[cfg_attr(test, allow(dead_code))]
impl WidgetError {
    pub(crate) fn create_failed(tag: &'static str, id: impl Into<String>) -> Self {
        Self::CreateFailed {
            tag,
            id: id.into(),
        }
    }

    pub(crate) fn wrong_type(id: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongElementType {
            id: id.into(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element() {
        assert_eq!(
            WidgetError::wrong_type("send-btn", "HtmlButtonElement").to_string(),
            "#send-btn exists but is not HtmlButtonElement"
        );
        assert_eq!(
            WidgetError::create_failed("form", "query-form").to_string(),
            "failed to create <form> for #query-form"
        );
    }
}
