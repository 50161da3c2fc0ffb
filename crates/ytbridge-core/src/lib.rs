//! ytbridge Core - YouTube iframe tech for media players
//!
//! This crate lets a player framework that expects a uniform media "tech"
//! (play/pause/seek/volume/duration/buffered/events) drive an embedded YouTube
//! iframe widget as if it were a native media element:
//! - One-time bootstrap of the iframe API script, shared by every tech on a page
//! - Queuing of techs created before the API signals readiness
//! - Host command forwarding with deferred play
//! - Widget state → host event translation
//! - Playback quality → video dimension mapping
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        ytbridge Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   Host player ──commands──▶ ┌──────────────┐ ──calls──▶ Widget  │
//! │        ▲                    │ YoutubeTech  │                    │
//! │        └─────host events────└──────┬───────┘ ◀──callbacks──     │
//! │                                    │                            │
//! │                    enqueue / load  │                            │
//! │                             ┌──────┴──────┐   ┌──────────────┐  │
//! │                             │  Registry   │──▶│ ScriptLoader │  │
//! │                             └─────────────┘   └──────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the page's single UI thread, so shared state lives in
//! `Rc`/`RefCell` rather than behind locks.

pub mod error;
pub mod types;
pub mod media_id;
pub mod options;
pub mod host;
pub mod widget;
pub mod scheduler;
pub mod registry;
pub mod tech;

pub use error::{Error, Result};
pub use types::*;
pub use media_id::extract_media_id;
pub use options::{PlayerVars, SourceDescriptor, TechOptions, WidgetConfig};
pub use host::Host;
pub use widget::{Widget, WidgetCallbacks, WidgetFactory};
pub use scheduler::{ManualScheduler, Scheduler};
#[cfg(feature = "tokio-scheduler")]
pub use scheduler::TokioScheduler;
pub use registry::{Loadable, Registry, ScriptLoader, IFRAME_API_URL};
pub use tech::{TechEnvironment, YoutubeTech, BIG_PLAY_HIDE_DELAY, VOLUME_EVENT_DELAY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// MIME-like source type handled by this tech
pub const YOUTUBE_MIME_TYPE: &str = "video/youtube";

/// Initialize the library
pub fn init() {
    tracing::info!(version = VERSION, "ytbridge Core initialized");
}
