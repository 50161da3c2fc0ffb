//! Host player contract
//!
//! The tech only touches the host through this trait: event emission,
//! showing and hiding its chrome, and a few player-level slots.

use crate::types::{Affordance, Resolution, TechEvent};

/// The media player framework hosting the tech
pub trait Host {
    /// Host player id; the widget placeholder id is derived from it
    fn id(&self) -> String;

    /// Insert the element the widget will mount into
    fn create_placeholder(&self, element_id: &str);

    /// Emit an event on the host's event bus
    fn trigger(&self, event: TechEvent);

    /// Signal that the tech finished its ready handshake
    fn trigger_ready(&self);

    /// Show or hide a piece of host chrome
    fn set_affordance_visible(&self, affordance: Affordance, visible: bool);

    /// Enable or disable the host's control bar
    fn set_controls(&self, enabled: bool);

    /// Update the host-visible video dimensions
    fn set_video_dimensions(&self, resolution: Resolution);

    /// Store the last widget error code on the host
    fn set_error(&self, code: i32);

    /// Platforms where the widget refuses programmatic playback (mobile)
    fn blocks_programmatic_play(&self) -> bool {
        false
    }
}
