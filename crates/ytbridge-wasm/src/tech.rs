//! `YoutubeTech` class exported to JavaScript

use crate::{host::PlayerHost, page};
use js_sys::Function;
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use ytbridge_core::{Error, SourceDescriptor, TechOptions, YoutubeTech};

fn to_js(err: Error) -> JsValue {
    JsError::new(&format!("{} ({})", err, err.error_code())).into()
}

/// Buffered range handed back to JavaScript
#[derive(Serialize)]
struct BufferedRange {
    start: f64,
    end: f64,
}

/// Media tech driving a YouTube iframe player
#[wasm_bindgen(js_name = YoutubeTech)]
pub struct WasmYoutubeTech {
    tech: YoutubeTech,
}

#[wasm_bindgen(js_class = YoutubeTech)]
impl WasmYoutubeTech {
    /// `new YoutubeTech(player, options, ready?)`
    #[wasm_bindgen(constructor)]
    pub fn new(player: JsValue, options: JsValue, ready: Option<Function>) -> Result<WasmYoutubeTech, JsValue> {
        let options: TechOptions = serde_wasm_bindgen::from_value(options)?;
        let host = Rc::new(PlayerHost::new(player, ready));
        let tech = YoutubeTech::new(host, options, &page::environment()).map_err(to_js)?;
        Ok(Self { tech })
    }

    #[wasm_bindgen(js_name = isSupported)]
    pub fn is_supported() -> bool {
        YoutubeTech::is_supported()
    }

    /// True iff `source.type` is `video/youtube`
    #[wasm_bindgen(js_name = canPlaySource)]
    pub fn can_play_source(source: JsValue) -> bool {
        serde_wasm_bindgen::from_value::<SourceDescriptor>(source)
            .map(|source| YoutubeTech::can_play_source(&source))
            .unwrap_or(false)
    }

    pub fn play(&self) {
        self.tech.play();
    }

    pub fn pause(&self) {
        self.tech.pause();
    }

    pub fn paused(&self) -> bool {
        self.tech.paused()
    }

    #[wasm_bindgen(js_name = currentTime)]
    pub fn current_time(&self) -> f64 {
        self.tech.current_time()
    }

    #[wasm_bindgen(js_name = setCurrentTime)]
    pub fn set_current_time(&self, seconds: f64) {
        self.tech.set_current_time(seconds);
    }

    pub fn duration(&self) -> f64 {
        self.tech.duration()
    }

    /// `{start, end}` in seconds
    pub fn buffered(&self) -> Result<JsValue, JsValue> {
        let range = self.tech.buffered();
        Ok(serde_wasm_bindgen::to_value(&BufferedRange {
            start: range.start,
            end: range.end,
        })?)
    }

    pub fn volume(&self) -> f64 {
        self.tech.volume()
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        self.tech.set_volume(volume);
    }

    pub fn muted(&self) -> bool {
        self.tech.muted()
    }

    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&self, muted: bool) {
        self.tech.set_muted(muted);
    }

    /// Switch to another YouTube URL
    pub fn src(&self, url: &str) -> Result<(), JsValue> {
        self.tech.set_source(url).map_err(to_js)
    }

    #[wasm_bindgen(getter, js_name = mediaId)]
    pub fn media_id(&self) -> String {
        self.tech.media_id()
    }

    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.tech.is_ready()
    }

    #[wasm_bindgen(getter, js_name = fullscreenResize)]
    pub fn fullscreen_resize(&self) -> bool {
        self.tech.features().fullscreen_resize
    }

    pub fn dispose(&self) {
        self.tech.dispose();
    }
}
