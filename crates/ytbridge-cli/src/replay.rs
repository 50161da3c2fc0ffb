//! Headless tech for replaying widget state codes

use std::cell::RefCell;
use std::rc::Rc;
use ytbridge_core::{
    Affordance, Host, ManualScheduler, Registry, Resolution, ScriptLoader, SourceDescriptor,
    TechEnvironment, TechEvent, TechOptions, Widget, WidgetCallbacks, WidgetConfig,
    WidgetFactory, YoutubeTech,
};

const SAMPLE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

type Listeners = Rc<RefCell<Vec<Box<dyn Fn(i32)>>>>;

#[derive(Default)]
struct ReplayHost {
    events: RefCell<Vec<TechEvent>>,
    chrome: RefCell<Vec<(Affordance, bool)>>,
}

impl Host for ReplayHost {
    fn id(&self) -> String {
        "replay".to_string()
    }

    fn create_placeholder(&self, _element_id: &str) {}

    fn trigger(&self, event: TechEvent) {
        self.events.borrow_mut().push(event);
    }

    fn trigger_ready(&self) {}

    fn set_affordance_visible(&self, affordance: Affordance, visible: bool) {
        self.chrome.borrow_mut().push((affordance, visible));
    }

    fn set_controls(&self, _enabled: bool) {}

    fn set_video_dimensions(&self, _resolution: Resolution) {}

    fn set_error(&self, _code: i32) {}
}

/// Widget that only relays state codes
struct ReplayWidget {
    listeners: Listeners,
}

impl Widget for ReplayWidget {
    fn play_video(&self) {}
    fn pause_video(&self) {}
    fn seek_to(&self, _seconds: f64, _allow_seek_ahead: bool) {}
    fn load_video_by_id(&self, _video_id: &str) {}

    fn current_time(&self) -> f64 {
        0.0
    }

    fn duration(&self) -> f64 {
        0.0
    }

    fn video_bytes_loaded(&self) -> f64 {
        0.0
    }

    fn video_bytes_total(&self) -> f64 {
        0.0
    }

    fn video_start_bytes(&self) -> f64 {
        0.0
    }

    fn volume(&self) -> f64 {
        100.0
    }

    fn set_volume(&self, _volume: f64) {}

    fn is_muted(&self) -> bool {
        false
    }

    fn mute(&self) {}
    fn un_mute(&self) {}

    fn add_state_listener(&self, listener: Box<dyn Fn(i32)>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn destroy(&self) {}
}

#[derive(Default)]
struct ReplayFactory {
    listeners: Listeners,
    callbacks: RefCell<Option<WidgetCallbacks>>,
}

impl WidgetFactory for ReplayFactory {
    fn create(&self, _config: WidgetConfig, callbacks: WidgetCallbacks) -> Box<dyn Widget> {
        *self.callbacks.borrow_mut() = Some(callbacks);
        Box::new(ReplayWidget {
            listeners: self.listeners.clone(),
        })
    }
}

struct NoopLoader;

impl ScriptLoader for NoopLoader {
    fn inject(&self, _src: &str) {}
}

/// A ready tech fed by hand
pub struct Replay {
    host: Rc<ReplayHost>,
    factory: Rc<ReplayFactory>,
    scheduler: Rc<ManualScheduler>,
    tech: YoutubeTech,
}

impl Replay {
    /// Build, bootstrap and ready a tech. Returns the replay and the events
    /// emitted during the ready handshake.
    pub fn start(native_controls: bool) -> anyhow::Result<(Self, Vec<TechEvent>)> {
        let host = Rc::new(ReplayHost::default());
        let factory = Rc::new(ReplayFactory::default());
        let scheduler = Rc::new(ManualScheduler::new());
        let registry = Rc::new(Registry::new(NoopLoader));
        registry.on_bootstrap_ready();

        let env = TechEnvironment::new(registry, factory.clone(), scheduler.clone());
        let options = TechOptions {
            native_controls,
            ..TechOptions::new(SourceDescriptor::youtube(SAMPLE_URL))
        };
        let tech = YoutubeTech::new(host.clone(), options, &env)?;

        let callbacks = factory
            .callbacks
            .borrow()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("widget was not created"))?;
        (callbacks.on_ready)();
        scheduler.run_all();

        let replay = Self {
            host,
            factory,
            scheduler,
            tech,
        };
        let startup = replay.drain();
        Ok((replay, startup))
    }

    /// Feed one state code; returns the host events it produced
    pub fn step(&self, code: i32) -> Vec<TechEvent> {
        for listener in self.factory.listeners.borrow().iter() {
            listener(code);
        }
        self.scheduler.run_all();
        self.drain()
    }

    /// Host chrome changes made so far
    pub fn chrome(&self) -> Vec<(Affordance, bool)> {
        self.host.chrome.borrow().clone()
    }

    pub fn tech(&self) -> &YoutubeTech {
        &self.tech
    }

    fn drain(&self) -> Vec<TechEvent> {
        std::mem::take(&mut *self.host.events.borrow_mut())
    }
}
