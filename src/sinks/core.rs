// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;

/// Trait for various backends that send Statsd metrics somewhere.
///
/// Each call to `emit` receives one complete datagram: a single metric in
/// the canonical Statsd format, already encoded one byte per character and
/// terminated by a newline. Examples of each supported metric type are
/// given below.
///
/// ## Counter
///
/// ``` text
/// some.counter:123|c
/// ```
///
/// ## Timer
///
/// ``` text
/// some.timer:456|ms
/// ```
///
/// ## Gauge
///
/// ``` text
/// some.gauge:5|g
/// ```
///
/// Sampled metrics carry the rate they were sampled at.
///
/// ``` text
/// some.counter:1|c|@0.25
/// ```
pub trait MetricSink {
    /// Send the datagram using this sink and return the number of bytes
    /// written or an I/O error.
    fn emit(&self, datagram: &[u8]) -> io::Result<usize>;

    /// Release any resources held by this sink.
    ///
    /// Must be safe to call more than once and must not fail. Sinks that own
    /// a socket return an error from any `emit` after they are closed. The
    /// default implementation does nothing.
    fn close(&self) {}
}

/// Implementation of a `MetricSink` that discards all metrics.
///
/// Useful for disabling metric collection or unit tests.
#[derive(Debug, Clone)]
pub struct NopMetricSink;

impl MetricSink for NopMetricSink {
    fn emit(&self, datagram: &[u8]) -> io::Result<usize> {
        Ok(datagram.len())
    }
}
