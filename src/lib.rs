// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small, thread safe Statsd client for Rust!
//!
//! Statsd Pipe sends counters, gauges, and timings to a Statsd server over
//! UDP, one datagram per metric, with optional client side sampling.
//!
//! ## Features
//!
//! * Counters (incremented or decremented, for one or many keys), gauges,
//!   and timings in milliseconds.
//! * Client side sampling with the `|@rate` suffix understood by Statsd.
//! * An optional error handler deciding if the rest of a batch is sent
//!   when a write fails.
//! * Support for alternate backends via the `MetricSink` trait.
//!
//! ## Usage
//!
//! ### Simple Use
//!
//! Create a client that writes to a Statsd server and send a few metrics.
//! Every operation returns `Ok(true)` if a datagram was written, `Ok(false)`
//! if nothing was (all of the metrics were sampled out, for example) and
//! an error if a write failed and no error handler was configured.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use statsd_pipe::prelude::*;
//! use statsd_pipe::{CounterOptions, SampleRate, StatsdClient, DEFAULT_PORT};
//!
//! // Note that you'll probably want to actually handle any errors creating
//! // the client when you use it for real in your application.
//! let client = StatsdClient::from_udp_host(("metrics.example.com", DEFAULT_PORT)).unwrap();
//!
//! client.incr("user.logins").unwrap();
//! client.decrement(&["jobs.pending", "jobs.active"], CounterOptions::new().with_magnitude(2)).unwrap();
//! client.gauge_with("pool.connections", 12, SampleRate::new(0.5)).unwrap();
//! client.time("db.query", Duration::from_millis(22)).unwrap();
//! ```
//!
//! ### Sampling
//!
//! Sample rates below `1.0` mean each key is only sent with that
//! probability. Metrics that are sent carry the rate so the server can
//! scale them back up.
//!
//! ```rust
//! use statsd_pipe::prelude::*;
//! use statsd_pipe::{CounterOptions, SpyMetricSink, StatsdClient};
//!
//! let (rx, sink) = SpyMetricSink::new();
//! let client = StatsdClient::from_sink(sink);
//!
//! // A rate of zero never sends anything
//! let options = CounterOptions::new().with_sample_rate(0.0);
//! assert!(!client.increment(&["requests"], options).unwrap());
//! assert!(rx.try_recv().is_err());
//! ```
//!
//! ### Error Handling
//!
//! Without an error handler, the first failed write ends the operation and
//! is returned to the caller. With one, the handler is passed the error and
//! says if the remaining keys of the same call should still be sent.
//!
//! ```rust
//! use statsd_pipe::prelude::*;
//! use statsd_pipe::{CounterOptions, MetricError, StatsdClient, NopMetricSink};
//!
//! fn keep_going(err: MetricError) -> bool {
//!     eprintln!("Metric error! {}", err);
//!     true
//! }
//!
//! let client = StatsdClient::builder(NopMetricSink)
//!     .with_prefix("my.app")
//!     .with_error_handler(keep_going)
//!     .build();
//!
//! client.increment(&["a", "b", "c"], CounterOptions::default()).unwrap();
//! ```
//!
//! ### Custom Metric Sinks
//!
//! The `StatsdClient` writes datagrams to an implementation of the
//! `MetricSink` trait. A custom sink is shown below.
//!
//! ```rust
//! use std::io;
//! use statsd_pipe::prelude::*;
//! use statsd_pipe::{StatsdClient, MetricSink};
//!
//! pub struct MyMetricSink;
//!
//! impl MetricSink for MyMetricSink {
//!     fn emit(&self, datagram: &[u8]) -> io::Result<usize> {
//!         // Your custom metric sink implementation goes here!
//!         Ok(datagram.len())
//!     }
//! }
//!
//! let client = StatsdClient::from_sink(MyMetricSink);
//! client.incr("some.counter").unwrap();
//! ```
//!
//! ### Closing
//!
//! `StatsdClient::close()` releases the socket while the client may still
//! be shared with other threads. It waits for a write in progress to finish
//! and later writes fail.
//!
//! ## Logging
//!
//! Diagnostics are emitted through the `log` crate at `debug` and `trace`
//! levels. Nothing is logged unless the application installs a logger.

#![forbid(unsafe_code)]

pub const DEFAULT_PORT: u16 = 8125;

pub use self::client::{
    Counted, CountedExt, CounterOptions, Gauged, MetricClient, StatsdClient, StatsdClientBuilder, Timed,
};

pub use self::sampler::{SampleRate, Sampler, ThreadRngSampler};

pub use self::sinks::{MetricSink, NopMetricSink, SpyMetricSink, UdpMetricSink};

pub use self::types::{Counter, ErrorKind, Gauge, Metric, MetricError, MetricResult, Timer};

mod builder;
mod client;
pub mod ext;
pub mod prelude;
mod sampler;
mod sinks;
mod types;


mod sealed {
    pub trait Sealed {}
}
