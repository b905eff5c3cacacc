// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Extension points for the library
//!
//! Code that wraps a `StatsdClient` to send metrics of its own making, or
//! that needs to see how values become part of a metric, can make use of
//! these extension points.

pub use crate::builder::MetricValue;
pub use crate::client::{MetricBackend, ToGaugeValue, ToTimerValue};
