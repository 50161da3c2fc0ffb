//! Bootstrap registry
//!
//! Coordinates the one-time load of the iframe API script for a whole page:
//! - the script is requested at most once, whatever the number of techs
//! - techs created before the API signals readiness wait in a FIFO queue
//! - the queue is drained exactly once, in order, when readiness arrives
//!
//! There is no retry or timeout. If the script never signals readiness the
//! queued techs simply never load. The queue holds weak references, so a tech
//! dropped while waiting is released and skipped.

use crate::{Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, info};

/// Location of the iframe API bootstrap script
pub const IFRAME_API_URL: &str = "https://www.youtube.com/iframe_api";

/// Inserts the bootstrap script into the page
pub trait ScriptLoader {
    fn inject(&self, src: &str);
}

/// Something waiting for the iframe API
pub trait Loadable {
    fn load(&self);
}

/// Page-wide bootstrap state and pending queue
pub struct Registry {
    loader: Box<dyn ScriptLoader>,
    /// Reports an iframe API that was already present before we asked for it
    runtime_probe: Option<Box<dyn Fn() -> bool>>,
    requested: Cell<bool>,
    ready: Cell<bool>,
    pending: RefCell<VecDeque<Weak<dyn Loadable>>>,
}

impl Registry {
    pub fn new(loader: impl ScriptLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            runtime_probe: None,
            requested: Cell::new(false),
            ready: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Consult `probe` before queuing, so a page that already has the API
    /// loads techs immediately
    pub fn with_runtime_probe(mut self, probe: impl Fn() -> bool + 'static) -> Self {
        self.runtime_probe = Some(Box::new(probe));
        self
    }

    /// Whether the iframe API is usable. Monotonic.
    pub fn is_ready(&self) -> bool {
        if self.ready.get() {
            return true;
        }
        if self.runtime_probe.as_ref().is_some_and(|probe| probe()) {
            debug!("Iframe API already present");
            self.on_bootstrap_ready();
        }
        self.ready.get()
    }

    /// Whether the bootstrap script has been requested
    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Number of queued techs still alive
    pub fn pending_len(&self) -> usize {
        self.pending
            .borrow()
            .iter()
            .filter(|item| item.strong_count() > 0)
            .count()
    }

    /// Insert the bootstrap script, once per registry
    pub fn request_bootstrap(&self) {
        if self.requested.replace(true) {
            return;
        }
        info!(src = IFRAME_API_URL, "Requesting iframe API");
        self.loader.inject(IFRAME_API_URL);
    }

    /// Queue `item` until the API signals readiness. The caller keeps it alive.
    pub fn enqueue(&self, item: &Rc<dyn Loadable>) -> Result<()> {
        if self.ready.get() {
            return Err(Error::BootstrapAlreadyReady);
        }
        {
            let mut pending = self.pending.borrow_mut();
            pending.retain(|queued| queued.strong_count() > 0);
            pending.push_back(Rc::downgrade(item));
        }
        debug!(pending = self.pending_len(), "Queued for iframe API");
        Ok(())
    }

    /// Load `item` now if the API is ready, otherwise queue it and make sure
    /// the bootstrap script is on its way. Returns true if loaded now.
    pub fn load_or_enqueue(&self, item: Rc<dyn Loadable>) -> bool {
        if self.is_ready() {
            item.load();
            return true;
        }
        // not ready, so enqueue cannot fail
        let _ = self.enqueue(&item);
        self.request_bootstrap();
        false
    }

    /// Global readiness signal from the iframe API
    pub fn on_bootstrap_ready(&self) {
        if !self.ready.replace(true) {
            info!(pending = self.pending_len(), "Iframe API ready");
        }

        // pop one at a time so no borrow is held across load()
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(item) => {
                    if let Some(item) = item.upgrade() {
                        item.load();
                    }
                }
                None => break,
            }
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("requested", &self.requested.get())
            .field("ready", &self.ready.get())
            .field("pending", &self.pending_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct CountingLoader(Rc<RefCell<Vec<String>>>);

    impl ScriptLoader for CountingLoader {
        fn inject(&self, src: &str) {
            self.0.borrow_mut().push(src.to_string());
        }
    }

    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Loadable for Probe {
        fn load(&self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn probe(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<dyn Loadable> {
        Rc::new(Probe { name, log: log.clone() })
    }

    #[test]
    fn test_bootstrap_requested_once() {
        let loader = CountingLoader::default();
        let registry = Registry::new(loader.clone());

        for _ in 0..5 {
            registry.request_bootstrap();
        }

        assert!(registry.is_requested());
        assert_eq!(*loader.0.borrow(), vec![IFRAME_API_URL.to_string()]);
    }

    #[test]
    fn test_queue_drained_in_order_once() {
        let loader = CountingLoader::default();
        let registry = Registry::new(loader.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        let techs = [probe("a", &log), probe("b", &log), probe("c", &log)];
        for tech in &techs {
            assert!(!registry.load_or_enqueue(tech.clone()));
        }
        assert!(log.borrow().is_empty());
        assert_eq!(registry.pending_len(), 3);
        assert_eq!(loader.0.borrow().len(), 1);

        registry.on_bootstrap_ready();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(registry.pending_len(), 0);

        // a repeated signal finds nothing left to load
        registry.on_bootstrap_ready();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_after_ready_loads_immediately() {
        let registry = Registry::new(CountingLoader::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        registry.on_bootstrap_ready();
        assert!(registry.is_ready());
        assert!(registry.load_or_enqueue(probe("late", &log)));
        assert_eq!(*log.borrow(), vec!["late"]);
        assert_eq!(registry.pending_len(), 0);
        assert!(matches!(
            registry.enqueue(&probe("x", &log)),
            Err(Error::BootstrapAlreadyReady)
        ));
    }

    #[test]
    fn test_dropped_items_are_released() {
        let registry = Registry::new(CountingLoader::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        let kept = probe("kept", &log);
        let dropped = probe("dropped", &log);
        registry.load_or_enqueue(dropped.clone());
        registry.load_or_enqueue(kept.clone());
        assert_eq!(registry.pending_len(), 2);

        drop(dropped);
        assert_eq!(registry.pending_len(), 1);

        registry.on_bootstrap_ready();
        assert_eq!(*log.borrow(), vec!["kept"]);
    }

    #[test]
    fn test_ready_on_empty_queue() {
        let registry = Registry::new(CountingLoader::default());
        registry.on_bootstrap_ready();
        assert!(registry.is_ready());
        assert!(!registry.is_requested());
    }

    #[test]
    fn test_runtime_probe() {
        let loader = CountingLoader::default();
        let registry = Registry::new(loader.clone()).with_runtime_probe(|| true);
        let log = Rc::new(RefCell::new(Vec::new()));

        assert!(registry.load_or_enqueue(probe("a", &log)));
        assert!(loader.0.borrow().is_empty());
        assert_eq!(*log.borrow(), vec!["a"]);
    }
}
