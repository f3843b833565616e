use super::*;

pub(super) fn resolve_document() -> Result<Document, WidgetError> {
    let window = web_sys::window().ok_or(WidgetError::WindowUnavailable)?;
    window.document().ok_or(WidgetError::DocumentUnavailable)
}

/// Builds whatever part of the widget markup the host page did not ship.
struct Bootstrap<'a> {
    document: &'a Document,
    root: Option<HtmlElement>,
    created: usize,
}

impl<'a> Bootstrap<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            document,
            root: document
                .get_element_by_id(CHAT_ROOT_ID)
                .and_then(|element| element.dyn_into::<HtmlElement>().ok()),
            created: 0,
        }
    }

    fn root(&mut self) -> Result<HtmlElement, WidgetError> {
        if let Some(root) = self.root.as_ref() {
            return Ok(root.clone());
        }
        let body = self.document.body().ok_or(WidgetError::BodyUnavailable)?;
        let root = create_element(self.document, "section")?;
        root.set_id(CHAT_ROOT_ID);
        body.append_child(&root)
            .map_err(|_| WidgetError::AppendFailed {
                id: CHAT_ROOT_ID.to_string(),
            })?;
        self.root = Some(root.clone());
        Ok(root)
    }

    /// Existing element with `id`, or a new `tag` appended to `parent` (the
    /// widget root when `None`). The flag reports whether it was created.
    fn find_or_create(
        &mut self,
        id: &str,
        tag: &'static str,
        parent: Option<&HtmlElement>,
    ) -> Result<(HtmlElement, bool), WidgetError> {
        if let Some(existing) = self.document.get_element_by_id(id) {
            let element = existing
                .dyn_into::<HtmlElement>()
                .map_err(|_| WidgetError::wrong_type(id, "HtmlElement"))?;
            return Ok((element, false));
        }

        let parent = match parent {
            Some(parent) => parent.clone(),
            None => self.root()?,
        };
        let element = self
            .document
            .create_element(tag)
            .map_err(|_| WidgetError::create_failed(tag, id))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| WidgetError::wrong_type(id, "HtmlElement"))?;
        element.set_id(id);
        parent
            .append_child(&element)
            .map_err(|_| WidgetError::AppendFailed { id: id.to_string() })?;
        self.created += 1;
        Ok((element, true))
    }

    fn install_style(&self) -> Result<(), WidgetError> {
        if self.created == 0 || self.document.get_element_by_id(CHAT_STYLE_ID).is_some() {
            return Ok(());
        }
        let style = create_element(self.document, "style")?;
        style.set_id(CHAT_STYLE_ID);
        style.set_text_content(Some(BOOTSTRAP_CSS));
        let parent: HtmlElement = match self.document.head() {
            Some(head) => head.into(),
            None => self.document.body().ok_or(WidgetError::BodyUnavailable)?,
        };
        parent
            .append_child(&style)
            .map_err(|_| WidgetError::AppendFailed {
                id: CHAT_STYLE_ID.to_string(),
            })?;
        Ok(())
    }
}

pub(super) fn ensure_chat_dom(document: &Document) -> Result<ChatElements, WidgetError> {
    let mut bootstrap = Bootstrap::new(document);

    let (messages, _) = bootstrap.find_or_create(CHAT_MESSAGES_ID, "div", None)?;

    let (form, _) = bootstrap.find_or_create(QUERY_FORM_ID, "form", None)?;
    let (input, created) = bootstrap.find_or_create(USER_INPUT_ID, "input", Some(&form))?;
    if created {
        let _ = input.set_attribute("type", "text");
        let _ = input.set_attribute("autocomplete", "off");
        let _ = input.set_attribute("placeholder", INPUT_PLACEHOLDER);
    }
    let input = input
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| WidgetError::wrong_type(USER_INPUT_ID, "HtmlInputElement"))?;
    let (send, created) = bootstrap.find_or_create(SEND_BUTTON_ID, "button", Some(&form))?;
    if created {
        let _ = send.set_attribute("type", "submit");
        send.set_text_content(Some("Send"));
    }
    let send = send
        .dyn_into::<HtmlButtonElement>()
        .map_err(|_| WidgetError::wrong_type(SEND_BUTTON_ID, "HtmlButtonElement"))?;

    let (log_list, created) = bootstrap.find_or_create(LOG_LIST_ID, "div", None)?;
    if created {
        let placeholder = create_element(document, "div")?;
        placeholder.set_class_name(EMPTY_STATE_CLASS);
        placeholder.set_text_content(Some(EMPTY_STATE_TEXT));
        let _ = log_list.append_child(&placeholder);
    }

    let (modal_overlay, created) = bootstrap.find_or_create(MODAL_OVERLAY_ID, "div", None)?;
    let modal_parent = if created {
        modal_overlay.set_class_name(&format!("modal-overlay {HIDDEN_CLASS}"));
        let dialog = create_element(document, "div")?;
        dialog.set_class_name("modal");
        let _ = modal_overlay.append_child(&dialog);
        dialog
    } else {
        modal_overlay.clone()
    };
    let (modal_close, created) =
        bootstrap.find_or_create(MODAL_CLOSE_ID, "button", Some(&modal_parent))?;
    if created {
        let _ = modal_close.set_attribute("type", "button");
        let _ = modal_close.set_attribute("aria-label", "Close");
        modal_close.set_text_content(Some("×"));
    }
    let (modal_title, _) = bootstrap.find_or_create(MODAL_TITLE_ID, "h3", Some(&modal_parent))?;
    let (modal_content, _) =
        bootstrap.find_or_create(MODAL_CONTENT_ID, "div", Some(&modal_parent))?;

    bootstrap.install_style()?;
    if bootstrap.created > 0 {
        tracing::debug!(created = bootstrap.created, "created missing widget markup");
    }

    Ok(ChatElements {
        document: document.clone(),
        messages,
        form,
        input,
        send,
        log_list,
        modal_overlay,
        modal_title,
        modal_content,
        modal_close,
    })
}

pub(super) fn create_element(document: &Document, tag: &'static str) -> Result<HtmlElement, WidgetError> {
    document
        .create_element(tag)
        .map_err(|_| WidgetError::create_failed(tag, tag))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WidgetError::wrong_type(tag, "HtmlElement"))
}

fn append(parent: &HtmlElement, child: &web_sys::Node, what: &str) -> Result<(), WidgetError> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|_| WidgetError::AppendFailed {
            id: what.to_string(),
        })
}

fn scroll_to_bottom(element: &HtmlElement) {
    element.set_scroll_top(element.scroll_height());
}

pub(super) fn clock_now() -> ClockTime {
    let now = js_sys::Date::new_0();
    ClockTime::from_hms(now.get_hours(), now.get_minutes(), now.get_seconds())
        .unwrap_or_else(ClockTime::midnight)
}

impl ChatController {
    fn create(&self, tag: &'static str) -> Result<HtmlElement, WidgetError> {
        create_element(&self.elements.document, tag)
    }

    pub(super) fn append_message(&self, text: &str, role: MessageRole) -> Result<(), WidgetError> {
        let message = self.session.borrow_mut().append_message(text, role).clone();
        self.render_message(&message)
    }

    pub(super) fn render_message(&self, message: &TranscriptMessage) -> Result<(), WidgetError> {
        let row = self.create("div")?;
        row.set_class_name(&format!("{MESSAGE_CLASS} {}", message.role.css_class()));
        let content = self.create("div")?;
        content.set_class_name(MESSAGE_CONTENT_CLASS);

        for fragment in &message.fragments {
            match fragment {
                MessageFragment::Text(text) => {
                    let node = self.elements.document.create_text_node(text);
                    append(&content, &node, "message text")?;
                }
                MessageFragment::LineBreak => {
                    append(&content, &self.create("br")?.into(), "line break")?;
                }
                MessageFragment::ParagraphBreak => {
                    append(&content, &self.create("br")?.into(), "paragraph break")?;
                    append(&content, &self.create("br")?.into(), "paragraph break")?;
                }
            }
        }

        append(&row, &content, "message content")?;
        append(&self.elements.messages, &row, CHAT_MESSAGES_ID)?;
        scroll_to_bottom(&self.elements.messages);
        Ok(())
    }

    pub(super) fn remove_empty_state(&self) {
        if let Ok(Some(placeholder)) = self
            .elements
            .log_list
            .query_selector(EMPTY_STATE_SELECTOR)
        {
            placeholder.remove();
        }
    }

    /// Appends a collapsible group for `group` to the log panel, expanded.
    pub(super) fn create_query_log_group(self: &Rc<Self>, group: GroupId) -> Result<(), WidgetError> {
        let (title, indicator_text) = {
            let session = self.session.borrow();
            let Some(state) = session.group(group) else {
                return Ok(());
            };
            (state.title.clone(), state.indicator())
        };

        let root = self.create("div")?;
        root.set_class_name(QUERY_GROUP_CLASS);
        let header = self.create("div")?;
        header.set_class_name(QUERY_GROUP_HEADER_CLASS);
        let title_element = self.create("span")?;
        title_element.set_class_name(QUERY_GROUP_TITLE_CLASS);
        title_element.set_text_content(Some(&title));
        let indicator = self.create("span")?;
        indicator.set_class_name(QUERY_GROUP_TOGGLE_CLASS);
        indicator.set_text_content(Some(indicator_text));
        let body = self.create("div")?;
        body.set_class_name(QUERY_GROUP_BODY_CLASS);

        append(&header, &title_element, QUERY_GROUP_TITLE_CLASS)?;
        append(&header, &indicator, QUERY_GROUP_TOGGLE_CLASS)?;
        append(&root, &header, QUERY_GROUP_HEADER_CLASS)?;
        append(&root, &body, QUERY_GROUP_BODY_CLASS)?;

        let weak = Rc::downgrade(self);
        self.listen(&header, "click", QUERY_GROUP_HEADER_CLASS, move |_event| {
            if let Some(controller) = weak.upgrade() {
                controller.toggle_group(group);
            }
        })?;

        append(&self.elements.log_list, &root, LOG_LIST_ID)?;
        scroll_to_bottom(&self.elements.log_list);
        self.groups.borrow_mut().insert(
            group,
            GroupElements {
                root,
                indicator,
                body,
            },
        );
        Ok(())
    }

    pub(super) fn toggle_group(&self, group: GroupId) {
        let Some(view) = self.session.borrow_mut().toggle_group(group) else {
            return;
        };
        let groups = self.groups.borrow();
        let Some(elements) = groups.get(&group) else {
            return;
        };
        let collapsed = view == GroupView::Collapsed;
        let _ = elements
            .root
            .class_list()
            .toggle_with_force(COLLAPSED_CLASS, collapsed);
        let display = if collapsed { "none" } else { "" };
        let _ = elements.body.style().set_property("display", display);
        let indicator = self
            .session
            .borrow()
            .group(group)
            .map(|state| state.indicator())
            .unwrap_or_default();
        elements.indicator.set_text_content(Some(indicator));
        tracing::debug!(group = group.0, ?view, "toggled query log group");
    }

    /// Renders `entry` as the next row of `group`'s body.
    pub(super) fn render_log_entry(self: &Rc<Self>, group: GroupId, entry: &LogEntry) -> Result<(), WidgetError> {
        self.remove_empty_state();
        let row: Option<LogRow> = self
            .session
            .borrow_mut()
            .record_log(group, entry, clock_now())
            .cloned();
        let Some(row) = row else {
            tracing::warn!(group = group.0, "log entry for unknown query group dropped");
            return Ok(());
        };
        let body = match self.groups.borrow().get(&group) {
            Some(elements) => elements.body.clone(),
            None => return Ok(()),
        };

        let element = self.create("div")?;
        let mut class_name = LOG_ENTRY_CLASS.to_string();
        if !row.class_name.is_empty() {
            class_name.push(' ');
            class_name.push_str(&row.class_name);
        }
        if row.is_clickable() {
            class_name.push(' ');
            class_name.push_str(LOG_CLICKABLE_CLASS);
        }
        element.set_class_name(&class_name);

        let header = self.create("span")?;
        header.set_class_name(LOG_HEADER_CLASS);
        header.set_text_content(Some(&row.header_text()));
        append(&element, &header, LOG_HEADER_CLASS)?;
        let message = self.elements.document.create_text_node(&format!(" {}", row.message));
        append(&element, &message, "log message")?;

        if let Some(detail) = row.detail {
            let hint = self.create("div")?;
            hint.set_class_name(LOG_DETAIL_HINT_CLASS);
            hint.set_text_content(Some(context_chat_core::log_panel::DETAIL_HINT));
            append(&element, &hint, LOG_DETAIL_HINT_CLASS)?;

            let weak = Rc::downgrade(self);
            self.listen(&element, "click", LOG_ENTRY_CLASS, move |event| {
                event.stop_propagation();
                if let Some(controller) = weak.upgrade() {
                    controller.show_modal(&detail);
                }
            })?;
        }

        append(&body, &element, LOG_ENTRY_CLASS)?;
        scroll_to_bottom(&self.elements.log_list);
        Ok(())
    }

    pub(super) fn show_modal(&self, detail: &LogRowDetail) {
        self.session.borrow_mut().show_modal(detail);
        self.sync_modal();
        tracing::debug!(title = %detail.title, "opened log detail");
    }

    pub(super) fn hide_modal(&self) {
        self.session.borrow_mut().hide_modal();
        self.sync_modal();
    }

    /// Copies the session's modal state onto the overlay.
    fn sync_modal(&self) {
        let session = self.session.borrow();
        let modal = session.modal();
        self.elements.modal_title.set_text_content(Some(&modal.title));
        self.elements.modal_content.set_text_content(Some(&modal.body));
        let _ = self
            .elements
            .modal_overlay
            .class_list()
            .toggle_with_force(HIDDEN_CLASS, !modal.visible);
    }

    /// Copies the session's composer state onto the input and send control.
    pub(super) fn sync_controls(&self) {
        let session = self.session.borrow();
        let composer = session.composer();
        self.elements.input.set_disabled(!composer.input_enabled());
        self.elements.send.set_disabled(!composer.send_enabled());
        if composer.focus_input() {
            let _ = self.elements.input.focus();
        }
    }
}
