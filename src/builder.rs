// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sampler::SampleRate;
use std::fmt::{self, Write};

/// Type of metric that knows how to display itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetricType {
    Counter,
    Timer,
    Gauge,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricType::Counter => "c".fmt(f),
            MetricType::Timer => "ms".fmt(f),
            MetricType::Gauge => "g".fmt(f),
        }
    }
}

/// Holder for primitive metric values that knows how to display itself
///
/// This type is internal to how values that are valid for each type of
/// metric (e.g. types for which `ToGaugeValue` or `ToTimerValue` are
/// implemented) get formatted but is exposed for documentation purposes
/// and advanced use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Signed(i64),
    Unsigned(u64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Signed(v) => v.fmt(f),
            MetricValue::Unsigned(v) => v.fmt(f),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MetricFormatter<'a> {
    prefix: &'a str,
    key: &'a str,
    val: MetricValue,
    type_: MetricType,
    sample_rate: Option<SampleRate>,
}

impl<'a> MetricFormatter<'a> {
    const SAMPLE_RATE_PREFIX: &'static str = "|@";

    pub(crate) fn counter(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Counter)
    }

    pub(crate) fn timer(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Timer)
    }

    pub(crate) fn gauge(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Gauge)
    }

    fn from_val(prefix: &'a str, key: &'a str, val: MetricValue, type_: MetricType) -> Self {
        MetricFormatter {
            prefix,
            key,
            val,
            type_,
            sample_rate: None,
        }
    }

    pub(crate) fn key(&self) -> &str {
        self.key
    }

    /// Mark this metric as sampled at the given rate. Rates of 1.0 and
    /// above mean the metric isn't sampled and so nothing is written.
    pub(crate) fn with_sample_rate(&mut self, rate: SampleRate) {
        if rate.is_sampling() {
            self.sample_rate = Some(rate);
        }
    }

    #[rustfmt::skip]
    fn size_hint(&self) -> usize {
        let base = self.prefix.len() + self.key.len() + 1 /* : */ + 20 /* value */ + 1 /* | */ + 2 /* type */;
        match self.sample_rate {
            Some(_) => base + Self::SAMPLE_RATE_PREFIX.len() + 4, /* 0.00 */
            None => base,
        }
    }

    pub(crate) fn format(&self) -> String {
        let mut metric_string = String::with_capacity(self.size_hint());
        let _ = write!(
            metric_string,
            "{}{}:{}|{}",
            self.prefix, self.key, self.val, self.type_
        );

        if let Some(rate) = self.sample_rate {
            metric_string.push_str(Self::SAMPLE_RATE_PREFIX);
            let _ = write!(metric_string, "{}", rate);
        }

        metric_string
    }
}

/// Encode a formatted metric as the bytes of a single datagram.
///
/// Each character becomes exactly one byte followed by a trailing newline.
/// Characters outside of Latin-1 have no single byte form and are replaced
/// with `?`.
pub(crate) fn encode_datagram(metric: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(metric.len() + 1);
    out.extend(
        metric
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')),
    );
    out.push(b'\n');
    out
}
