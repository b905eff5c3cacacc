// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rand::Rng;
use std::fmt;

/// Represents the sample rate of a metric, the fraction of calls that should
/// actually result in a datagram being sent to the Statsd server.
///
/// Rates of 1.0 and above disable sampling: the metric is always sent and the
/// rate isn't written. Rates below 1.0 cause a random draw for every metric,
/// and metrics that are sent carry a `|@rate` suffix, formatted with two
/// decimal places, so the server can scale the values it receives. Rates of
/// 0.0 and below (and NaN) never send anything.
///
/// # Example
///
/// ```
/// use statsd_pipe::SampleRate;
///
/// let rate = SampleRate::from(0.25);
/// assert_eq!("0.25", rate.to_string());
/// assert_eq!(SampleRate::ALWAYS, SampleRate::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SampleRate(f64);

impl SampleRate {
    /// Send every metric, the default.
    pub const ALWAYS: SampleRate = SampleRate(1.0);

    pub fn new(value: f64) -> Self {
        SampleRate(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// True if metrics at this rate go through a random draw.
    pub(crate) fn is_sampling(&self) -> bool {
        self.0 < 1.0 || self.0.is_nan()
    }

    /// Decide the fate of a single metric, drawing from the sampler only
    /// when the rate requires it.
    pub(crate) fn decide(&self, sampler: &dyn Sampler) -> Decision {
        if self.0 >= 1.0 {
            Decision::Unsampled
        } else if self.0 > 0.0 && sampler.draw() <= self.0 {
            Decision::Sampled
        } else {
            Decision::Rejected
        }
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        SampleRate::ALWAYS
    }
}

impl From<f64> for SampleRate {
    fn from(value: f64) -> Self {
        SampleRate(value)
    }
}

impl From<f32> for SampleRate {
    fn from(value: f32) -> Self {
        SampleRate(f64::from(value))
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Outcome of sampling a single metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Not subject to sampling, send without a rate
    Unsampled,
    /// Won the draw, send with the rate attached
    Sampled,
    /// Lost the draw, don't send
    Rejected,
}

/// Source of the random draws used to decide if a sampled metric is sent.
///
/// Implementations are shared between every thread using a client, so they
/// must not serialize callers on a single generator. The default,
/// `ThreadRngSampler`, uses the generator local to the calling thread.
pub trait Sampler {
    /// Return a value uniformly distributed in `[0.0, 1.0)`.
    fn draw(&self) -> f64;
}

/// `Sampler` implementation backed by `rand::thread_rng()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSampler;

impl Sampler for ThreadRngSampler {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}
