//! Core types for ytbridge

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tech instance, used to correlate log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechId(pub Uuid);

impl TechId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TechId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TechId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Events emitted on the host's event bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TechEvent {
    TechReady,
    DurationChange,
    TimeUpdate,
    Playing,
    Play,
    Pause,
    Waiting,
    Ended,
    VolumeChange,
    /// Emitted after the video dimensions change with playback quality.
    /// Hosts listen for this name, so it is kept as-is.
    RateChange,
    Error { code: i32 },
}

impl TechEvent {
    /// Event name as seen by the host
    pub fn name(&self) -> &'static str {
        match self {
            TechEvent::TechReady => "techready",
            TechEvent::DurationChange => "durationchange",
            TechEvent::TimeUpdate => "timeupdate",
            TechEvent::Playing => "playing",
            TechEvent::Play => "play",
            TechEvent::Pause => "pause",
            TechEvent::Waiting => "waiting",
            TechEvent::Ended => "ended",
            TechEvent::VolumeChange => "volumechange",
            TechEvent::RateChange => "ratechange",
            TechEvent::Error { .. } => "error",
        }
    }
}

impl std::fmt::Display for TechEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Playback state codes reported by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
    Unknown(i32),
}

impl PlaybackState {
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => PlaybackState::Unstarted,
            0 => PlaybackState::Ended,
            1 => PlaybackState::Playing,
            2 => PlaybackState::Paused,
            3 => PlaybackState::Buffering,
            5 => PlaybackState::Cued,
            other => PlaybackState::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            PlaybackState::Unstarted => -1,
            PlaybackState::Ended => 0,
            PlaybackState::Playing => 1,
            PlaybackState::Paused => 2,
            PlaybackState::Buffering => 3,
            PlaybackState::Cued => 5,
            PlaybackState::Unknown(code) => *code,
        }
    }

    /// Host events emitted when the widget enters this state
    pub fn host_events(&self) -> &'static [TechEvent] {
        use TechEvent::*;
        match self {
            PlaybackState::Unstarted => &[DurationChange],
            PlaybackState::Ended => &[Ended],
            PlaybackState::Playing => &[TimeUpdate, DurationChange, Playing, Play],
            PlaybackState::Paused => &[Pause],
            PlaybackState::Buffering => &[TimeUpdate, Waiting],
            PlaybackState::Cued | PlaybackState::Unknown(_) => &[],
        }
    }

    /// Whether the media counts as advancing (not paused) in this state
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Buffering)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Unstarted => write!(f, "unstarted"),
            PlaybackState::Ended => write!(f, "ended"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Buffering => write!(f, "buffering"),
            PlaybackState::Cued => write!(f, "cued"),
            PlaybackState::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Video resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Resolution = Resolution::new(0, 0);
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Playback quality labels reported by the widget
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackQuality {
    Small,
    Medium,
    Large,
    Hd720,
    Hd1080,
    HighRes,
    Other(String),
}

impl PlaybackQuality {
    pub fn from_label(label: &str) -> Self {
        match label {
            "small" => PlaybackQuality::Small,
            "medium" => PlaybackQuality::Medium,
            "large" => PlaybackQuality::Large,
            "hd720" => PlaybackQuality::Hd720,
            "hd1080" => PlaybackQuality::Hd1080,
            "highres" => PlaybackQuality::HighRes,
            other => PlaybackQuality::Other(other.to_string()),
        }
    }

    /// Video dimensions the host should report for this quality
    pub fn dimensions(&self) -> Resolution {
        match self {
            PlaybackQuality::Small => Resolution::new(320, 240),
            PlaybackQuality::Medium => Resolution::new(480, 360),
            PlaybackQuality::Large => Resolution::new(640, 480),
            PlaybackQuality::Hd720 => Resolution::new(960, 720),
            PlaybackQuality::Hd1080 => Resolution::new(1440, 1080),
            PlaybackQuality::HighRes => Resolution::new(1920, 1080),
            PlaybackQuality::Other(_) => Resolution::ZERO,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PlaybackQuality::Small => "small",
            PlaybackQuality::Medium => "medium",
            PlaybackQuality::Large => "large",
            PlaybackQuality::Hd720 => "hd720",
            PlaybackQuality::Hd1080 => "hd1080",
            PlaybackQuality::HighRes => "highres",
            PlaybackQuality::Other(label) => label,
        }
    }

    /// All known qualities, smallest first
    pub fn known() -> [PlaybackQuality; 6] {
        [
            PlaybackQuality::Small,
            PlaybackQuality::Medium,
            PlaybackQuality::Large,
            PlaybackQuality::Hd720,
            PlaybackQuality::Hd1080,
            PlaybackQuality::HighRes,
        ]
    }
}

/// Buffered time range in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Host UI elements the tech shows or hides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affordance {
    BigPlayButton,
    Poster,
    LoadingSpinner,
}

/// Error codes the widget reports through its error callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetErrorCode {
    InvalidParameter,
    Html5Player,
    NotFound,
    EmbedNotAllowed,
    Other(i32),
}

impl WidgetErrorCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => WidgetErrorCode::InvalidParameter,
            5 => WidgetErrorCode::Html5Player,
            100 => WidgetErrorCode::NotFound,
            101 | 150 => WidgetErrorCode::EmbedNotAllowed,
            other => WidgetErrorCode::Other(other),
        }
    }
}

impl std::fmt::Display for WidgetErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetErrorCode::InvalidParameter => write!(f, "invalid parameter"),
            WidgetErrorCode::Html5Player => write!(f, "HTML5 player error"),
            WidgetErrorCode::NotFound => write!(f, "video not found or private"),
            WidgetErrorCode::EmbedNotAllowed => write!(f, "embedding not allowed"),
            WidgetErrorCode::Other(code) => write!(f, "error {}", code),
        }
    }
}

/// Optional tech capabilities advertised to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechFeatures {
    pub fullscreen_resize: bool,
    pub volume_control: bool,
}

impl Default for TechFeatures {
    fn default() -> Self {
        Self {
            fullscreen_resize: true,
            volume_control: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes() {
        for code in [-1, 0, 1, 2, 3, 5] {
            assert_eq!(PlaybackState::from_code(code).code(), code);
        }
        assert_eq!(PlaybackState::from_code(4), PlaybackState::Unknown(4));
    }

    #[test]
    fn test_state_events() {
        assert_eq!(
            PlaybackState::Playing.host_events(),
            &[TechEvent::TimeUpdate, TechEvent::DurationChange, TechEvent::Playing, TechEvent::Play]
        );
        assert!(PlaybackState::Cued.host_events().is_empty());
        assert!(PlaybackState::Buffering.is_active());
        assert!(!PlaybackState::Ended.is_active());
    }

    #[test]
    fn test_quality_dimensions() {
        assert_eq!(PlaybackQuality::from_label("hd720").dimensions(), Resolution::new(960, 720));
        assert_eq!(PlaybackQuality::from_label("highres").dimensions(), Resolution::new(1920, 1080));
        assert_eq!(PlaybackQuality::from_label("ultra").dimensions(), Resolution::ZERO);
        assert_eq!(PlaybackQuality::from_label("ultra").label(), "ultra");
    }

    #[test]
    fn test_event_names() {
        assert_eq!(TechEvent::RateChange.name(), "ratechange");
        assert_eq!(TechEvent::Error { code: 100 }.to_string(), "error");
        let json = serde_json::to_string(&TechEvent::Error { code: 100 }).unwrap();
        assert_eq!(json, r#"{"event":"error","code":100}"#);
    }

    #[test]
    fn test_error_code_classification() {
        assert_eq!(WidgetErrorCode::from_code(150), WidgetErrorCode::EmbedNotAllowed);
        assert_eq!(WidgetErrorCode::from_code(7), WidgetErrorCode::Other(7));
    }
}
