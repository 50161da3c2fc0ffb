//! YouTube tech - the per-element adapter
//!
//! Translates host media commands into widget calls and widget callbacks into
//! host events, while keeping a small cache of derived state:
//! - readiness and the "play requested before ready" flag
//! - the last widget playback state (duplicate reports are dropped)
//! - volume and mute (redundant sets are dropped)

use crate::{
    host::Host,
    media_id::extract_media_id,
    options::{PlayerVars, SourceDescriptor, TechOptions, WidgetConfig},
    registry::{Loadable, Registry},
    scheduler::Scheduler,
    types::*,
    widget::{Widget, WidgetCallbacks, WidgetFactory},
    Error, Result,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Delay before hiding the host's big play button; the host builds it after
/// constructing the tech
pub const BIG_PLAY_HIDE_DELAY: Duration = Duration::from_millis(50);

/// Delay before announcing a volume or mute change, trailing the widget's own
/// update
pub const VOLUME_EVENT_DELAY: Duration = Duration::from_millis(50);

/// Page-level collaborators shared by every tech
#[derive(Clone)]
pub struct TechEnvironment {
    pub registry: Rc<Registry>,
    pub factory: Rc<dyn WidgetFactory>,
    pub scheduler: Rc<dyn Scheduler>,
}

impl TechEnvironment {
    pub fn new(
        registry: Rc<Registry>,
        factory: Rc<dyn WidgetFactory>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            registry,
            factory,
            scheduler,
        }
    }
}

#[derive(Debug, Default)]
struct TechState {
    ready: bool,
    loaded: bool,
    disposed: bool,
    play_on_ready: bool,
    /// Source switched after load but before ready
    source_on_ready: bool,
    last_state: Option<PlaybackState>,
    volume: Option<f64>,
    muted: Option<bool>,
}

struct TechInner {
    id: TechId,
    host: Rc<dyn Host>,
    factory: Rc<dyn WidgetFactory>,
    scheduler: Rc<dyn Scheduler>,
    options: TechOptions,
    element_id: String,
    media_id: RefCell<String>,
    widget: RefCell<Option<Rc<dyn Widget>>>,
    state: RefCell<TechState>,
    this: Weak<TechInner>,
}

/// Media tech backed by an embedded YouTube widget
pub struct YoutubeTech {
    inner: Rc<TechInner>,
}

impl YoutubeTech {
    /// Create a tech for `options.source`.
    ///
    /// Fails when the source URL carries no media id. Otherwise the widget is
    /// created right away if the iframe API is ready, or once it signals
    /// readiness.
    pub fn new(host: Rc<dyn Host>, options: TechOptions, env: &TechEnvironment) -> Result<Self> {
        let media_id = options.source.media_id()?;
        let element_id = format!("{}_youtube_api", host.id());
        host.create_placeholder(&element_id);

        if options.native_controls {
            let chrome = host.clone();
            env.scheduler.schedule(
                BIG_PLAY_HIDE_DELAY,
                Box::new(move || chrome.set_affordance_visible(Affordance::BigPlayButton, false)),
            );
        }

        let inner = Rc::new_cyclic(|this| TechInner {
            id: TechId::new(),
            host,
            factory: env.factory.clone(),
            scheduler: env.scheduler.clone(),
            options,
            element_id,
            media_id: RefCell::new(media_id),
            widget: RefCell::new(None),
            state: RefCell::new(TechState::default()),
            this: this.clone(),
        });

        info!(
            tech_id = %inner.id,
            media_id = %inner.media_id.borrow(),
            element = %inner.element_id,
            "Creating YouTube tech"
        );

        let loadable: Rc<dyn Loadable> = inner.clone();
        if !env.registry.load_or_enqueue(loadable) {
            debug!(tech_id = %inner.id, "Waiting for iframe API");
        }

        Ok(Self { inner })
    }

    /// The tech works wherever the iframe API does
    pub fn is_supported() -> bool {
        true
    }

    /// True iff the source type is exactly `video/youtube`
    pub fn can_play_source(source: &SourceDescriptor) -> bool {
        source.is_youtube()
    }

    pub fn id(&self) -> TechId {
        self.inner.id
    }

    pub fn features(&self) -> TechFeatures {
        TechFeatures::default()
    }

    pub fn options(&self) -> &TechOptions {
        &self.inner.options
    }

    pub fn media_id(&self) -> String {
        self.inner.media_id.borrow().clone()
    }

    /// Id of the element the widget mounts into
    pub fn element_id(&self) -> &str {
        &self.inner.element_id
    }

    /// Whether the widget finished its ready handshake
    pub fn is_ready(&self) -> bool {
        self.inner.state.borrow().ready
    }

    /// Whether the widget instance has been created
    pub fn is_loaded(&self) -> bool {
        self.inner.state.borrow().loaded
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.state.borrow().disposed
    }

    /// Whether a play request is waiting for the ready handshake
    pub fn play_pending(&self) -> bool {
        self.inner.state.borrow().play_on_ready
    }

    /// Start playback, or remember the request until the widget is ready
    #[instrument(skip(self), fields(tech_id = %self.inner.id))]
    pub fn play(&self) {
        let inner = &self.inner;
        if inner.host.blocks_programmatic_play() {
            debug!("Programmatic play blocked on this platform");
            return;
        }
        if inner.state.borrow().disposed {
            return;
        }

        match inner.ready_widget() {
            Some(widget) => widget.play_video(),
            None => {
                inner.state.borrow_mut().play_on_ready = true;
                debug!("Play deferred until ready");
                if !inner.options.native_controls {
                    // keep it until playback really starts
                    inner
                        .host
                        .set_affordance_visible(Affordance::BigPlayButton, true);
                }
            }
        }
    }

    #[instrument(skip(self), fields(tech_id = %self.inner.id))]
    pub fn pause(&self) {
        if let Some(widget) = self.inner.ready_widget() {
            widget.pause_video();
        }
    }

    /// Paused unless the widget last reported playing or buffering
    pub fn paused(&self) -> bool {
        !self
            .inner
            .state
            .borrow()
            .last_state
            .is_some_and(|state| state.is_active())
    }

    /// Last playback state reported by the widget
    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.inner.state.borrow().last_state
    }

    pub fn current_time(&self) -> f64 {
        self.inner
            .ready_widget()
            .map_or(0.0, |widget| widget.current_time())
    }

    #[instrument(skip(self), fields(tech_id = %self.inner.id))]
    pub fn set_current_time(&self, seconds: f64) {
        if let Some(widget) = self.inner.ready_widget() {
            widget.seek_to(seconds, true);
            self.inner.host.trigger(TechEvent::TimeUpdate);
        }
    }

    pub fn duration(&self) -> f64 {
        self.inner
            .ready_widget()
            .map_or(0.0, |widget| widget.duration())
    }

    /// Buffered range estimated from the widget's byte counters
    pub fn buffered(&self) -> TimeRange {
        let Some(widget) = self.inner.ready_widget() else {
            return TimeRange::empty();
        };

        let loaded = widget.video_bytes_loaded();
        let total = widget.video_bytes_total();
        if loaded <= 0.0 || total <= 0.0 {
            return TimeRange::empty();
        }

        let duration = widget.duration();
        let start = widget.video_start_bytes() / total * duration;
        TimeRange::new(start, start + loaded / total * duration)
    }

    /// Volume in 0.0-1.0, read from the widget once and cached
    pub fn volume(&self) -> f64 {
        if let Some(volume) = self.inner.state.borrow().volume {
            return volume;
        }
        match self.inner.ready_widget() {
            Some(widget) => {
                let volume = widget.volume() / 100.0;
                self.inner.state.borrow_mut().volume = Some(volume);
                volume
            }
            None => 1.0,
        }
    }

    #[instrument(skip(self), fields(tech_id = %self.inner.id))]
    pub fn set_volume(&self, volume: f64) {
        let inner = &self.inner;
        if !volume.is_finite() {
            warn!(volume, "Ignoring non-finite volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        {
            let state = inner.state.borrow();
            if state.disposed {
                return;
            }
            if state.volume == Some(volume) {
                debug!(volume, "Volume unchanged");
                return;
            }
        }

        if let Some(widget) = inner.ready_widget() {
            widget.set_volume(volume * 100.0);
        }
        inner.state.borrow_mut().volume = Some(volume);
        inner.schedule_volume_change();
    }

    pub fn muted(&self) -> bool {
        match self.inner.ready_widget() {
            Some(widget) => widget.is_muted(),
            None => self.inner.state.borrow().muted.unwrap_or(false),
        }
    }

    #[instrument(skip(self), fields(tech_id = %self.inner.id))]
    pub fn set_muted(&self, muted: bool) {
        let inner = &self.inner;
        if inner.state.borrow().disposed {
            return;
        }
        if self.muted() == muted {
            debug!(muted, "Mute unchanged");
            return;
        }

        if let Some(widget) = inner.ready_widget() {
            if muted {
                widget.mute();
            } else {
                widget.un_mute();
            }
        }
        inner.state.borrow_mut().muted = Some(muted);
        inner.schedule_volume_change();
    }

    /// Switch to another YouTube URL
    #[instrument(skip(self), fields(tech_id = %self.inner.id))]
    pub fn set_source(&self, url: &str) -> Result<()> {
        let inner = &self.inner;
        if inner.state.borrow().disposed {
            return Err(Error::Disposed);
        }
        let media_id = extract_media_id(url).ok_or_else(|| Error::UnrecognizedSource {
            url: url.to_string(),
        })?;

        info!(media_id = %media_id, "Switching source");
        *inner.media_id.borrow_mut() = media_id.clone();
        match inner.ready_widget() {
            Some(widget) => widget.load_video_by_id(&media_id),
            None => {
                let mut state = inner.state.borrow_mut();
                // an unloaded widget is created with the new id anyway
                state.source_on_ready = state.loaded;
                debug!("Source switch deferred until ready");
            }
        }
        Ok(())
    }

    /// Destroy the widget. Later calls are no-ops.
    #[instrument(skip(self), fields(tech_id = %self.inner.id))]
    pub fn dispose(&self) {
        let inner = &self.inner;
        {
            let mut state = inner.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.ready = false;
            state.play_on_ready = false;
            state.source_on_ready = false;
        }

        let widget = inner.widget.borrow_mut().take();
        if let Some(widget) = widget {
            widget.destroy();
        }
        info!("YouTube tech disposed");
    }
}

impl std::fmt::Debug for YoutubeTech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeTech")
            .field("id", &self.inner.id)
            .field("media_id", &self.inner.media_id.borrow())
            .field("state", &self.inner.state.borrow())
            .finish()
    }
}

impl Loadable for TechInner {
    fn load(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.disposed || state.loaded {
                return;
            }
            state.loaded = true;
        }

        let config = WidgetConfig {
            element_id: self.element_id.clone(),
            video_id: self.media_id.borrow().clone(),
            player_vars: PlayerVars::from_options(&self.options, &self.element_id),
        };
        info!(tech_id = %self.id, video_id = %config.video_id, "Creating widget");

        let widget = self.factory.create(config, self.callbacks());
        *self.widget.borrow_mut() = Some(Rc::from(widget));
    }
}

impl TechInner {
    fn callbacks(&self) -> WidgetCallbacks {
        let ready = self.this.clone();
        let quality = self.this.clone();
        let error = self.this.clone();

        WidgetCallbacks {
            on_ready: Rc::new(move || {
                if let Some(tech) = ready.upgrade() {
                    tech.on_ready();
                }
            }),
            on_playback_quality_change: Rc::new(move |label| {
                if let Some(tech) = quality.upgrade() {
                    tech.on_playback_quality_change(label);
                }
            }),
            on_error: Rc::new(move |code| {
                if let Some(tech) = error.upgrade() {
                    tech.on_error(code);
                }
            }),
        }
    }

    /// The widget, once it has signaled ready and until disposal
    fn ready_widget(&self) -> Option<Rc<dyn Widget>> {
        let state = self.state.borrow();
        if !state.ready || state.disposed {
            return None;
        }
        self.widget.borrow().clone()
    }

    fn on_ready(&self) {
        let (play_on_ready, source_on_ready, volume, muted) = {
            let mut state = self.state.borrow_mut();
            if state.disposed || state.ready {
                return;
            }
            if self.widget.borrow().is_none() {
                warn!(tech_id = %self.id, "Ready signaled before widget creation returned");
                return;
            }
            state.ready = true;
            (
                std::mem::take(&mut state.play_on_ready),
                std::mem::take(&mut state.source_on_ready),
                state.volume,
                state.muted,
            )
        };
        info!(tech_id = %self.id, "Widget ready");

        let Some(widget) = self.ready_widget() else {
            return;
        };

        let listener = self.this.clone();
        widget.add_state_listener(Box::new(move |code| {
            if let Some(tech) = listener.upgrade() {
                tech.on_state_change(code);
            }
        }));

        // settings made before the widget could take them
        if source_on_ready {
            let media_id = self.media_id.borrow().clone();
            debug!(tech_id = %self.id, media_id = %media_id, "Applying deferred source");
            widget.load_video_by_id(&media_id);
        }
        if let Some(volume) = volume {
            widget.set_volume(volume * 100.0);
        }
        match muted {
            Some(true) => widget.mute(),
            Some(false) => widget.un_mute(),
            None => {}
        }

        let host = &self.host;
        host.trigger(TechEvent::TechReady);
        // the widget shows its own poster
        host.set_affordance_visible(Affordance::Poster, false);
        host.trigger_ready();
        host.trigger(TechEvent::DurationChange);

        if play_on_ready {
            debug!(tech_id = %self.id, "Starting deferred play");
            host.set_affordance_visible(Affordance::BigPlayButton, false);
            widget.play_video();
        }

        host.set_controls(!self.options.native_controls);
    }

    fn on_state_change(&self, code: i32) {
        let state = PlaybackState::from_code(code);
        {
            let mut cached = self.state.borrow_mut();
            if cached.disposed || cached.last_state == Some(state) {
                return;
            }
            cached.last_state = Some(state);
        }
        debug!(tech_id = %self.id, state = %state, "Playback state");

        for event in state.host_events() {
            self.host.trigger(*event);
        }

        match state {
            PlaybackState::Ended if !self.options.native_controls => {
                self.host
                    .set_affordance_visible(Affordance::BigPlayButton, true);
            }
            PlaybackState::Buffering => {
                // the widget has its own spinner
                self.host
                    .set_affordance_visible(Affordance::LoadingSpinner, false);
            }
            _ => {}
        }
    }

    fn on_playback_quality_change(&self, label: &str) {
        if self.state.borrow().disposed {
            return;
        }
        let resolution = PlaybackQuality::from_label(label).dimensions();
        debug!(tech_id = %self.id, quality = label, resolution = %resolution, "Playback quality");

        self.host.set_video_dimensions(resolution);
        self.host.trigger(TechEvent::RateChange);
    }

    fn on_error(&self, code: i32) {
        if self.state.borrow().disposed {
            return;
        }
        warn!(
            tech_id = %self.id,
            code,
            reason = %WidgetErrorCode::from_code(code),
            "Widget error"
        );
        self.host.set_error(code);
        self.host.trigger(TechEvent::Error { code });
    }

    fn schedule_volume_change(&self) {
        let tech = self.this.clone();
        self.scheduler.schedule(
            VOLUME_EVENT_DELAY,
            Box::new(move || {
                if let Some(tech) = tech.upgrade() {
                    if !tech.state.borrow().disposed {
                        tech.host.trigger(TechEvent::VolumeChange);
                    }
                }
            }),
        );
    }
}
