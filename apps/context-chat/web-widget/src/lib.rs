#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

#[cfg(any(target_arch = "wasm32", test))]
mod console_log;
#[cfg(any(target_arch = "wasm32", test))]
mod error;
#[cfg(any(target_arch = "wasm32", test))]
mod widget_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use web_time::{Duration, Instant};

    use context_chat_core::protocol::{
        AskFailure, AskResponse, HealthResponse, LogEntry, decode_ask_response,
        encode_ask_request, is_success_status,
    };
    use context_chat_core::{
        ChatSession, ClockTime, ConfigOverrides, GroupId, GroupView, LogRow, LogRowDetail,
        MessageFragment, MessageRole, RenderStep, Settlement, StaggerPlan, Submission,
        TranscriptMessage, WidgetConfig,
    };
    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement};

    use crate::console_log::init_console_tracing;
    use crate::error::WidgetError;
    use crate::widget_constants::*;

    mod dom;
    mod lifecycle;
    mod network;

    use dom::*;
    use lifecycle::*;
    use network::*;

    thread_local! {
        static CONTROLLER: RefCell<Option<Rc<ChatController>>> = const { RefCell::new(None) };
    }

    /// Page elements the controller renders into, resolved once at boot.
    struct ChatElements {
        document: Document,
        messages: HtmlElement,
        form: HtmlElement,
        input: HtmlInputElement,
        send: HtmlButtonElement,
        log_list: HtmlElement,
        modal_overlay: HtmlElement,
        modal_title: HtmlElement,
        modal_content: HtmlElement,
        modal_close: HtmlElement,
    }

    struct GroupElements {
        root: HtmlElement,
        indicator: HtmlElement,
        body: HtmlElement,
    }

    /// Single controller instance for the page. Lives until the page unloads.
    struct ChatController {
        config: WidgetConfig,
        elements: ChatElements,
        session: RefCell<ChatSession>,
        groups: RefCell<HashMap<GroupId, GroupElements>>,
        listeners: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>>,
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        let (config, rejected) = resolve_config();
        init_console_tracing(config.log_level);
        for error in &rejected {
            tracing::warn!(%error, "ignoring invalid widget config override");
        }

        if let Err(error) = when_dom_ready(move || mount(config)) {
            tracing::error!(%error, "context chat widget failed to start");
        }
    }

    fn mount(config: WidgetConfig) {
        match boot(config) {
            Ok(controller) => {
                tracing::info!(
                    ask_path = %controller.config.ask_path,
                    stagger_ms = controller.config.stagger_ms,
                    "context chat widget ready"
                );
                if controller.config.probe_health {
                    spawn_health_probe(controller.config.health_path.clone());
                }
                CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
            }
            Err(error) => {
                tracing::error!(%error, "context chat widget failed to start");
            }
        }
    }

    /// Submits `text` as if typed into the input. Does not check whether the
    /// controls are currently disabled.
    #[wasm_bindgen]
    pub fn submit_query(text: String) {
        let controller = CONTROLLER.with(|slot| slot.borrow().clone());
        match controller {
            Some(controller) => controller.submit(&text),
            None => tracing::warn!("submit_query called before the widget started"),
        }
    }

    #[wasm_bindgen]
    pub fn widget_config_json() -> String {
        let config = CONTROLLER
            .with(|slot| slot.borrow().as_ref().map(|controller| controller.config.clone()))
            .unwrap_or_else(|| resolve_config().0);
        serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string())
    }
}
