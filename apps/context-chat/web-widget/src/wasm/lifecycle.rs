use super::*;

/// Effective configuration plus a message for every rejected override.
pub(super) fn resolve_config() -> (WidgetConfig, Vec<String>) {
    let defaults = WidgetConfig::default();
    match read_config_overrides() {
        Ok(Some(overrides)) => {
            let (config, rejected) = defaults.with_overrides(overrides);
            (config, rejected.iter().map(ToString::to_string).collect())
        }
        Ok(None) => (defaults, Vec::new()),
        Err(message) => (defaults, vec![message]),
    }
}

fn read_config_overrides() -> Result<Option<ConfigOverrides>, String> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|_| format!("failed to read window.{CONFIG_GLOBAL}"))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let json = js_sys::JSON::stringify(&value)
        .map_err(|_| format!("window.{CONFIG_GLOBAL} is not serializable"))?;
    serde_json::from_str(&String::from(json))
        .map(Some)
        .map_err(|error| format!("window.{CONFIG_GLOBAL} is not a valid config object: {error}"))
}

/// Runs `run` now, or on `DOMContentLoaded` while the document is still
/// parsing.
pub(super) fn when_dom_ready(run: impl FnOnce() + 'static) -> Result<(), WidgetError> {
    let document = resolve_document()?;
    if document.ready_state() != "loading" {
        run();
        return Ok(());
    }
    let callback = Closure::once_into_js(run);
    document
        .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        .map_err(|_| WidgetError::ListenerFailed {
            event: "DOMContentLoaded",
            target: "document".to_string(),
        })
}

pub(super) fn boot(config: WidgetConfig) -> Result<Rc<ChatController>, WidgetError> {
    let document = resolve_document()?;
    let elements = ensure_chat_dom(&document)?;
    let controller = Rc::new(ChatController {
        session: RefCell::new(ChatSession::new(config.stagger_ms)),
        config,
        elements,
        groups: RefCell::new(HashMap::new()),
        listeners: RefCell::new(Vec::new()),
    });
    controller.install_handlers()?;
    Ok(controller)
}

/// Restores the composer in the session and copies it onto the page when
/// dropped, on every exit path of a submission.
struct ControlsGuard<'a> {
    controller: &'a ChatController,
}

impl Drop for ControlsGuard<'_> {
    fn drop(&mut self) {
        self.controller.session.borrow_mut().restore_controls();
        self.controller.sync_controls();
    }
}

impl ChatController {
    pub(super) fn listen(
        &self,
        target: &web_sys::EventTarget,
        event: &'static str,
        label: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<(), WidgetError> {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| WidgetError::ListenerFailed {
                event,
                target: label.to_string(),
            })?;
        self.listeners.borrow_mut().push(callback);
        Ok(())
    }

    fn install_handlers(self: &Rc<Self>) -> Result<(), WidgetError> {
        let weak = Rc::downgrade(self);
        self.listen(&self.elements.form, "submit", QUERY_FORM_ID, move |event| {
            event.prevent_default();
            if let Some(controller) = weak.upgrade() {
                let raw = controller.elements.input.value();
                controller.submit(&raw);
            }
        })?;

        let weak = Rc::downgrade(self);
        self.listen(&self.elements.modal_close, "click", MODAL_CLOSE_ID, move |_event| {
            if let Some(controller) = weak.upgrade() {
                controller.hide_modal();
            }
        })?;

        let weak = Rc::downgrade(self);
        self.listen(
            &self.elements.modal_overlay,
            "click",
            MODAL_OVERLAY_ID,
            move |event| {
                let Some(controller) = weak.upgrade() else {
                    return;
                };
                let on_backdrop = event
                    .target()
                    .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
                    .is_some_and(|node| controller.elements.modal_overlay.is_same_node(Some(&node)));
                if on_backdrop {
                    controller.hide_modal();
                }
            },
        )?;
        Ok(())
    }

    /// Sends one query. Blank input is ignored without touching the page.
    pub(super) fn submit(self: &Rc<Self>, raw: &str) {
        let submission = self.session.borrow_mut().submit(raw);
        let Some(submission) = submission else {
            return;
        };

        self.elements.input.set_value("");
        self.sync_controls();

        let user_message = self.session.borrow().transcript().last().cloned();
        if let Some(message) = user_message {
            if let Err(error) = self.render_message(&message) {
                tracing::error!(%error, "failed to render user message");
            }
        }
        if let Err(error) = self.create_query_log_group(submission.group) {
            tracing::error!(%error, group = submission.group.0, "failed to create query log group");
        }

        tracing::info!(
            group = submission.group.0,
            chars = submission.query.chars().count(),
            "submitting query"
        );
        let controller = Rc::clone(self);
        spawn_local(async move {
            controller.run_submission(submission).await;
        });
    }

    async fn run_submission(self: Rc<Self>, submission: Submission) {
        let _restore = ControlsGuard {
            controller: &self,
        };

        let started_at = Instant::now();
        let result = post_ask(&self.config.ask_path, &submission.query).await;
        let elapsed_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(response) => tracing::info!(
                group = submission.group.0,
                logs = response.logs.len(),
                elapsed_ms,
                "query answered"
            ),
            Err(failure) => match failure.status() {
                Some(status) => tracing::warn!(
                    group = submission.group.0,
                    status,
                    elapsed_ms,
                    %failure,
                    "query rejected by backend"
                ),
                None => tracing::error!(
                    group = submission.group.0,
                    elapsed_ms,
                    %failure,
                    "query request failed"
                ),
            },
        }

        let settlement = self.session.borrow_mut().settle(submission.group, result);
        self.sync_controls();
        match settlement {
            Settlement::Answered {
                group,
                response,
                plan,
            } => self.schedule_renders(group, response, plan),
            Settlement::Failed { message } => {
                if let Err(error) = self.render_message(&message) {
                    tracing::error!(%error, "failed to render error message");
                }
            }
        }
    }

    /// Starts one independent timer per plan step. Timers are never cancelled;
    /// a later query's timers simply interleave with these by fire time.
    fn schedule_renders(self: &Rc<Self>, group: GroupId, response: AskResponse, plan: StaggerPlan) {
        tracing::debug!(
            group = group.0,
            steps = plan.steps().len(),
            answer_in_ms = plan.answer_delay_ms(),
            "scheduling staggered renders"
        );
        let response = Rc::new(response);
        for scheduled in plan {
            let controller = Rc::clone(self);
            let response = Rc::clone(&response);
            spawn_local(async move {
                sleep(Duration::from_millis(u64::from(scheduled.delay_ms))).await;
                let rendered = match scheduled.step {
                    RenderStep::LogEntry { index } => match response.logs.get(index) {
                        Some(entry) => controller.render_log_entry(group, entry),
                        None => Ok(()),
                    },
                    RenderStep::Answer => {
                        controller.append_message(&response.answer, MessageRole::Assistant)
                    }
                };
                if let Err(error) = rendered {
                    tracing::error!(%error, group = group.0, "staggered render failed");
                }
            });
        }
    }
}
