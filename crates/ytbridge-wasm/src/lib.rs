//! ytbridge WASM - YouTube tech for browser media players
//!
//! Binds ytbridge-core to the page:
//! - `YT.Player` from the iframe API as the widget
//! - a video.js-style player object as the host
//! - `setTimeout` as the scheduler
//! - the global `onYouTubeIframeAPIReady` hook as the bootstrap signal
//!
//! ## Usage
//!
//! ```javascript
//! import init, { YoutubeTech } from '@ytbridge/wasm';
//!
//! await init();
//! const tech = new YoutubeTech(player, {
//!   nativeControls: false,
//!   source: { src: 'https://youtu.be/dQw4w9WgXcQ', type: 'video/youtube' },
//! }, () => console.log('tech ready'));
//! tech.play();
//! ```

use wasm_bindgen::prelude::*;

mod bindings;
mod host;
mod page;
mod tech;
mod widget;

pub use tech::WasmYoutubeTech;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"[ytbridge WASM] Initialized".into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    ytbridge_core::VERSION.to_string()
}

/// Media id of a YouTube URL, or undefined
#[wasm_bindgen(js_name = extractMediaId)]
pub fn extract_media_id(url: &str) -> Option<String> {
    ytbridge_core::extract_media_id(url)
}
