//! Bindings for the iframe API's `YT.Player`

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = YT)]
    pub type Player;

    #[wasm_bindgen(constructor, js_namespace = YT)]
    pub fn new(element_id: &str, options: &JsValue) -> Player;

    #[wasm_bindgen(method, js_name = playVideo)]
    pub fn play_video(this: &Player);

    #[wasm_bindgen(method, js_name = pauseVideo)]
    pub fn pause_video(this: &Player);

    #[wasm_bindgen(method, js_name = seekTo)]
    pub fn seek_to(this: &Player, seconds: f64, allow_seek_ahead: bool);

    #[wasm_bindgen(method, js_name = loadVideoById)]
    pub fn load_video_by_id(this: &Player, video_id: &str);

    #[wasm_bindgen(method, js_name = getCurrentTime)]
    pub fn get_current_time(this: &Player) -> f64;

    #[wasm_bindgen(method, js_name = getDuration)]
    pub fn get_duration(this: &Player) -> f64;

    #[wasm_bindgen(method, js_name = getVideoBytesLoaded)]
    pub fn get_video_bytes_loaded(this: &Player) -> f64;

    #[wasm_bindgen(method, js_name = getVideoBytesTotal)]
    pub fn get_video_bytes_total(this: &Player) -> f64;

    #[wasm_bindgen(method, js_name = getVideoStartBytes)]
    pub fn get_video_start_bytes(this: &Player) -> f64;

    #[wasm_bindgen(method, js_name = getVolume)]
    pub fn get_volume(this: &Player) -> f64;

    #[wasm_bindgen(method, js_name = setVolume)]
    pub fn set_volume(this: &Player, volume: f64);

    #[wasm_bindgen(method, js_name = isMuted)]
    pub fn is_muted(this: &Player) -> bool;

    #[wasm_bindgen(method)]
    pub fn mute(this: &Player);

    #[wasm_bindgen(method, js_name = unMute)]
    pub fn un_mute(this: &Player);

    #[wasm_bindgen(method, js_name = addEventListener)]
    pub fn add_event_listener(this: &Player, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method)]
    pub fn destroy(this: &Player);
}
