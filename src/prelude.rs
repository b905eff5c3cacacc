// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export the traits used to record metrics for easy glob imports
//!
//! # Example
//!
//! ```
//! use statsd_pipe::prelude::*;
//! use statsd_pipe::{StatsdClient, NopMetricSink};
//!
//! let client = StatsdClient::from_sink(NopMetricSink);
//!
//! client.incr("some.counter").unwrap();
//! client.decr("some.counter").unwrap();
//! client.time("some.timer", 23).unwrap();
//! client.gauge("some.gauge", 45).unwrap();
//! ```

pub use crate::client::{Counted, CountedExt, Gauged, MetricClient, Timed};
