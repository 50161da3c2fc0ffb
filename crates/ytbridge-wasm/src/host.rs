//! video.js-style player object as the ytbridge host

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use ytbridge_core::{Affordance, Host, Resolution, TechEvent};

fn warn(message: &str) {
    web_sys::console::warn_1(&format!("[ytbridge WASM] {}", message).into());
}

/// Call `target[name](...args)`
fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &name.into())?.dyn_into()?;
    method.apply(target, args)
}

/// Host backed by a player object exposing `id()`, `trigger()`,
/// `controls()` and the `bigPlayButton`/`posterImage`/`loadingSpinner`
/// components
pub struct PlayerHost {
    player: JsValue,
    ready: Option<Function>,
}

impl PlayerHost {
    pub fn new(player: JsValue, ready: Option<Function>) -> Self {
        Self { player, ready }
    }

    fn call(&self, name: &str, args: &Array) {
        if let Err(err) = call_method(&self.player, name, args) {
            warn(&format!("player.{}() failed: {:?}", name, err));
        }
    }

    fn set(&self, name: &str, value: &JsValue) {
        if Reflect::set(&self.player, &name.into(), value).is_err() {
            warn(&format!("could not set player.{}", name));
        }
    }

    fn component(affordance: Affordance) -> &'static str {
        match affordance {
            Affordance::BigPlayButton => "bigPlayButton",
            Affordance::Poster => "posterImage",
            Affordance::LoadingSpinner => "loadingSpinner",
        }
    }
}

impl Host for PlayerHost {
    fn id(&self) -> String {
        call_method(&self.player, "id", &Array::new())
            .ok()
            .and_then(|id| id.as_string())
            .unwrap_or_default()
    }

    fn create_placeholder(&self, element_id: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(placeholder) = document.create_element("div") else {
            warn("could not create placeholder");
            return;
        };
        placeholder.set_id(element_id);
        placeholder.set_class_name("vjs-tech");

        let Some(player_el) = document.get_element_by_id(&self.id()) else {
            warn("player element not found");
            return;
        };
        let first = player_el.first_child();
        if player_el.insert_before(&placeholder, first.as_ref()).is_err() {
            warn("could not insert placeholder");
        }
    }

    fn trigger(&self, event: TechEvent) {
        self.call("trigger", &Array::of1(&event.name().into()));
    }

    fn trigger_ready(&self) {
        if let Some(ready) = &self.ready {
            if let Err(err) = ready.call0(&JsValue::NULL) {
                warn(&format!("ready callback failed: {:?}", err));
            }
        }
    }

    fn set_affordance_visible(&self, affordance: Affordance, visible: bool) {
        let name = Self::component(affordance);
        let Ok(component) = Reflect::get(&self.player, &name.into()) else {
            return;
        };
        if component.is_undefined() || component.is_null() {
            return;
        }
        let method = if visible { "show" } else { "hide" };
        if let Err(err) = call_method(&component, method, &Array::new()) {
            warn(&format!("{}.{}() failed: {:?}", name, method, err));
        }
    }

    fn set_controls(&self, enabled: bool) {
        self.call("controls", &Array::of1(&enabled.into()));
    }

    fn set_video_dimensions(&self, resolution: Resolution) {
        self.set("videoWidth", &resolution.width.into());
        self.set("videoHeight", &resolution.height.into());
    }

    fn set_error(&self, code: i32) {
        self.set("error", &code.into());
    }

    fn blocks_programmatic_play(&self) -> bool {
        let agent = web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default();
        ["iPhone", "iPad", "iPod", "Android"]
            .iter()
            .any(|platform| agent.contains(platform))
    }
}
