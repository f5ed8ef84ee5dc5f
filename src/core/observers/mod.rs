// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Observers
//!
//! Observers watch the state of a minimizer at initialization and after
//! every iteration: the iterate, cost, optimality proxy, evaluation counters
//! and solver-specific metrics. The [`SlogLogger`] observer (behind the
//! `slog-logger` feature) logs this progress to the terminal; custom
//! observers implement the [`Observe`] trait.
//!
//! For each observer an [`ObserverMode`] defines how often it is called:
//! `Always`, `Every(i)` (every `i`th iteration) or `Never`.

#[cfg(feature = "slog-logger")]
pub mod slog_logger;

#[cfg(feature = "slog-logger")]
pub use slog_logger::*;

use crate::core::{Error, IterState, KV};
use std::sync::{Arc, Mutex};

/// An interface which every observer is required to implement
pub trait Observe {
    /// Called once after initialization of the minimizer.
    fn observe_init(&mut self, _name: &str, _kv: &KV) -> Result<(), Error> {
        Ok(())
    }

    /// Called after every iteration of the minimizer.
    fn observe_iter(&mut self, _state: &IterState, _kv: &KV) -> Result<(), Error> {
        Ok(())
    }
}

type ObserversVec = Vec<(Arc<Mutex<dyn Observe>>, ObserverMode)>;

/// Container for observers.
///
/// Implements [`Observe`] itself and dispatches to the stored observers
/// according to their [`ObserverMode`].
#[derive(Clone, Default)]
pub struct Observers {
    observers: ObserversVec,
}

impl Observers {
    /// Construct a new empty `Observers` instance.
    pub fn new() -> Self {
        Observers { observers: vec![] }
    }

    /// Add another observer with a corresponding [`ObserverMode`].
    pub fn push<OBS: Observe + 'static>(&mut self, observer: OBS, mode: ObserverMode) -> &mut Self {
        self.observers.push((Arc::new(Mutex::new(observer)), mode));
        self
    }

    /// Returns true if there are no observers stored.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Observe for Observers {
    fn observe_init(&mut self, name: &str, kv: &KV) -> Result<(), Error> {
        for observer in self.observers.iter() {
            observer.0.lock().unwrap().observe_init(name, kv)?
        }
        Ok(())
    }

    fn observe_iter(&mut self, state: &IterState, kv: &KV) -> Result<(), Error> {
        for observer in self.observers.iter_mut() {
            let iter = state.get_iter();
            let obs = &mut observer.0.lock().unwrap();
            match observer.1 {
                ObserverMode::Always => obs.observe_iter(state, kv),
                ObserverMode::Every(i) if iter % i == 0 => obs.observe_iter(state, kv),
                ObserverMode::Never | ObserverMode::Every(_) => Ok(()),
            }?
        }
        Ok(())
    }
}

/// Indicates when to call an observer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ObserverMode {
    /// Never call the observer
    Never,
    /// Call the observer in every iteration
    Always,
    /// Call the observer every N iterations
    Every(u64),
}

impl Default for ObserverMode {
    /// The default for `ObserverMode` is `Always`
    fn default() -> ObserverMode {
        ObserverMode::Always
    }
}
