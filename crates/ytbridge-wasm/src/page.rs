//! Page-wide wiring: script loader, timers and the bootstrap hook

use crate::widget::IframeFactory;
use js_sys::{Function, Reflect};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use ytbridge_core::{scheduler::Task, Registry, Scheduler, ScriptLoader, TechEnvironment};

/// Global the iframe API calls once it is ready
const READY_HOOK: &str = "onYouTubeIframeAPIReady";

thread_local! {
    static ENVIRONMENT: TechEnvironment = page_environment();
}

/// Collaborators shared by every tech on the page
pub fn environment() -> TechEnvironment {
    ENVIRONMENT.with(|env| env.clone())
}

fn page_environment() -> TechEnvironment {
    let registry = Rc::new(Registry::new(PageScriptLoader).with_runtime_probe(iframe_api_present));
    install_ready_hook(registry.clone());
    TechEnvironment::new(registry, Rc::new(IframeFactory), Rc::new(TimeoutScheduler))
}

/// `YT.Player` exists once the API has finished loading
fn iframe_api_present() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    Reflect::get(&window, &"YT".into())
        .ok()
        .filter(|yt| yt.is_object())
        .and_then(|yt| Reflect::get(&yt, &"Player".into()).ok())
        .is_some_and(|player| player.is_function())
}

/// Route the global ready hook to the registry, keeping any hook the page
/// installed before us
fn install_ready_hook(registry: Rc<Registry>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let previous = Reflect::get(&window, &READY_HOOK.into())
        .ok()
        .and_then(|hook| hook.dyn_into::<Function>().ok());

    let hook = Closure::<dyn FnMut()>::new(move || {
        registry.on_bootstrap_ready();
        if let Some(previous) = &previous {
            let _ = previous.call0(&JsValue::NULL);
        }
    });
    if Reflect::set(&window, &READY_HOOK.into(), hook.as_ref()).is_err() {
        web_sys::console::error_1(&"[ytbridge WASM] Could not install ready hook".into());
    }
    // lives for the page
    hook.forget();
}

/// Inserts the iframe API `<script>` ahead of the page's first script
#[derive(Debug, Default, Clone, Copy)]
pub struct PageScriptLoader;

impl ScriptLoader for PageScriptLoader {
    fn inject(&self, src: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(tag) = document.create_element("script") else {
            return;
        };
        let Ok(script) = tag.dyn_into::<web_sys::HtmlScriptElement>() else {
            return;
        };
        script.set_src(src);

        let first_script = document.get_elements_by_tag_name("script").item(0);
        let inserted = match first_script.as_ref().and_then(|s| s.parent_node()) {
            Some(parent) => parent.insert_before(&script, first_script.as_deref()),
            None => match document.document_element() {
                Some(root) => root.append_child(&script),
                None => return,
            },
        };
        if inserted.is_err() {
            web_sys::console::error_1(&"[ytbridge WASM] Could not insert iframe API script".into());
        }
    }
}

/// Scheduler backed by `window.setTimeout`
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || task());
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay.as_millis() as i32,
        );
    }
}
