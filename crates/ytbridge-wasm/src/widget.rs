//! `YT.Player` as a ytbridge widget

use crate::bindings::Player;
use js_sys::{Object, Reflect};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use ytbridge_core::{Widget, WidgetCallbacks, WidgetConfig, WidgetFactory};

type EventClosure = Closure<dyn FnMut(JsValue)>;

/// `event.data` of an iframe API event
fn event_data(event: &JsValue) -> JsValue {
    Reflect::get(event, &"data".into()).unwrap_or(JsValue::UNDEFINED)
}

/// Drop `closures` on the next tick, so a callback the player queued before
/// `destroy()` still finds them
fn release_later(closures: Vec<EventClosure>) {
    if closures.is_empty() {
        return;
    }
    let Some(window) = web_sys::window() else {
        // no event loop left to call them
        return;
    };
    let release = Closure::once_into_js(move || drop(closures));
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(release.unchecked_ref(), 0);
}

/// Widget wrapping a live `YT.Player`
pub struct IframeWidget {
    player: Player,
    /// Keeps the JS callbacks alive as long as the player
    closures: RefCell<Vec<EventClosure>>,
}

impl Widget for IframeWidget {
    fn play_video(&self) {
        self.player.play_video();
    }

    fn pause_video(&self) {
        self.player.pause_video();
    }

    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) {
        self.player.seek_to(seconds, allow_seek_ahead);
    }

    fn load_video_by_id(&self, video_id: &str) {
        self.player.load_video_by_id(video_id);
    }

    fn current_time(&self) -> f64 {
        self.player.get_current_time()
    }

    fn duration(&self) -> f64 {
        self.player.get_duration()
    }

    fn video_bytes_loaded(&self) -> f64 {
        self.player.get_video_bytes_loaded()
    }

    fn video_bytes_total(&self) -> f64 {
        self.player.get_video_bytes_total()
    }

    fn video_start_bytes(&self) -> f64 {
        self.player.get_video_start_bytes()
    }

    fn volume(&self) -> f64 {
        self.player.get_volume()
    }

    fn set_volume(&self, volume: f64) {
        self.player.set_volume(volume);
    }

    fn is_muted(&self) -> bool {
        self.player.is_muted()
    }

    fn mute(&self) {
        self.player.mute();
    }

    fn un_mute(&self) {
        self.player.un_mute();
    }

    fn add_state_listener(&self, listener: Box<dyn Fn(i32)>) {
        let closure = EventClosure::new(move |event: JsValue| {
            if let Some(code) = event_data(&event).as_f64() {
                listener(code as i32);
            }
        });
        self.player
            .add_event_listener("onStateChange", closure.as_ref().unchecked_ref());
        self.closures.borrow_mut().push(closure);
    }

    fn destroy(&self) {
        let closures = self.closures.take();
        self.player.destroy();
        release_later(closures);
    }
}

/// Creates `YT.Player` instances
#[derive(Debug, Default, Clone, Copy)]
pub struct IframeFactory;

impl IframeFactory {
    fn player_options(config: &WidgetConfig) -> JsValue {
        serde_wasm_bindgen::to_value(config).unwrap_or_else(|err| {
            web_sys::console::error_1(&format!("[ytbridge WASM] Bad widget config: {}", err).into());
            Object::new().into()
        })
    }
}

impl WidgetFactory for IframeFactory {
    fn create(&self, config: WidgetConfig, callbacks: WidgetCallbacks) -> Box<dyn Widget> {
        let on_ready = callbacks.on_ready.clone();
        let on_quality = callbacks.on_playback_quality_change.clone();
        let on_error = callbacks.on_error.clone();

        let closures = vec![
            (
                "onReady",
                EventClosure::new(move |_event: JsValue| on_ready()),
            ),
            (
                "onPlaybackQualityChange",
                EventClosure::new(move |event: JsValue| {
                    if let Some(label) = event_data(&event).as_string() {
                        on_quality(&label);
                    }
                }),
            ),
            (
                "onError",
                EventClosure::new(move |event: JsValue| {
                    let code = event_data(&event).as_f64().unwrap_or_default();
                    on_error(code as i32);
                }),
            ),
        ];

        let events = Object::new();
        for (name, closure) in &closures {
            let _ = Reflect::set(&events, &(*name).into(), closure.as_ref());
        }

        let options = Self::player_options(&config);
        let _ = Reflect::set(&options, &"events".into(), &events);

        let player = Player::new(&config.element_id, &options);
        Box::new(IframeWidget {
            player,
            closures: RefCell::new(closures.into_iter().map(|(_, c)| c).collect()),
        })
    }
}
