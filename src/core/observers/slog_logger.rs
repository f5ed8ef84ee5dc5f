// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Loggers based on the `slog` crate

use crate::core::observers::Observe;
use crate::core::{Error, IterState, KV};
use slog::{info, o, Drain, Key, Record, Serializer};
use slog_async::OverflowStrategy;

/// A logger based on `slog`
#[derive(Clone)]
pub struct SlogLogger {
    /// the logger
    logger: slog::Logger,
}

impl SlogLogger {
    /// Log to the terminal in a blocking way
    pub fn term() -> Self {
        SlogLogger::term_internal(OverflowStrategy::Block)
    }

    /// Log to the terminal in a non-blocking way (in case of overflow, messages are dropped)
    pub fn term_noblock() -> Self {
        SlogLogger::term_internal(OverflowStrategy::Drop)
    }

    fn term_internal(overflow_strategy: OverflowStrategy) -> Self {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator)
            .use_original_order()
            .build()
            .fuse();
        let drain = slog_async::Async::new(drain)
            .overflow_strategy(overflow_strategy)
            .build()
            .fuse();
        SlogLogger {
            logger: slog::Logger::root(drain, o!()),
        }
    }
}

/// This type is necessary in order to be able to implement `slog::KV` on `KV`
pub struct SlogKV {
    /// Key value store
    pub kv: Vec<(&'static str, String)>,
}

impl slog::KV for SlogKV {
    fn serialize(&self, _record: &Record, serializer: &mut dyn Serializer) -> slog::Result {
        for idx in self.kv.iter().rev() {
            serializer.emit_str(Key::from(idx.0), &idx.1)?;
        }
        Ok(())
    }
}

impl slog::KV for IterState {
    fn serialize(&self, _record: &Record, serializer: &mut dyn Serializer) -> slog::Result {
        serializer.emit_u64(Key::from("hessian_count"), self.hessian_count)?;
        serializer.emit_u64(Key::from("gradient_count"), self.gradient_count)?;
        serializer.emit_u64(Key::from("cost_count"), self.cost_count)?;
        serializer.emit_str(Key::from("size"), &self.size.to_string())?;
        serializer.emit_str(Key::from("cost"), &self.cost.to_string())?;
        serializer.emit_u64(Key::from("iter"), self.get_iter())?;
        Ok(())
    }
}

impl<'a> From<&'a KV> for SlogKV {
    fn from(i: &'a KV) -> SlogKV {
        SlogKV { kv: i.kv.clone() }
    }
}

impl Observe for SlogLogger {
    /// Log general info
    fn observe_init(&mut self, msg: &str, kv: &KV) -> Result<(), Error> {
        info!(self.logger, "{}", msg; SlogKV::from(kv));
        Ok(())
    }

    /// Logs iteration data.
    fn observe_iter(&mut self, state: &IterState, kv: &KV) -> Result<(), Error> {
        info!(self.logger, ""; state, SlogKV::from(kv));
        Ok(())
    }
}
