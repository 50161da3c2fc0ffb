//! Embedded widget contract

use crate::options::WidgetConfig;
use std::rc::Rc;

/// A live widget instance
pub trait Widget {
    fn play_video(&self);
    fn pause_video(&self);
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool);
    fn load_video_by_id(&self, video_id: &str);

    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;

    fn video_bytes_loaded(&self) -> f64;
    fn video_bytes_total(&self) -> f64;
    fn video_start_bytes(&self) -> f64;

    /// Volume in the widget's 0-100 scale
    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);
    fn is_muted(&self) -> bool;
    fn mute(&self);
    fn un_mute(&self);

    /// Subscribe to playback state codes
    fn add_state_listener(&self, listener: Box<dyn Fn(i32)>);

    /// Tear down the instance and its iframe
    fn destroy(&self);
}

/// Callbacks bound at widget creation
///
/// Each closure captures the owning tech, so no back-pointer on the widget
/// is needed. The widget must invoke them asynchronously, never from inside
/// `WidgetFactory::create`.
#[derive(Clone)]
pub struct WidgetCallbacks {
    pub on_ready: Rc<dyn Fn()>,
    pub on_playback_quality_change: Rc<dyn Fn(&str)>,
    pub on_error: Rc<dyn Fn(i32)>,
}

impl std::fmt::Debug for WidgetCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetCallbacks").finish_non_exhaustive()
    }
}

/// Creates widget instances once the iframe API is available
pub trait WidgetFactory {
    fn create(&self, config: WidgetConfig, callbacks: WidgetCallbacks) -> Box<dyn Widget>;
}
