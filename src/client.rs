// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::{encode_datagram, MetricFormatter, MetricValue};
use crate::sampler::{Decision, SampleRate, Sampler, ThreadRngSampler};
use crate::sealed::Sealed;
use crate::sinks::{MetricSink, UdpMetricSink};
use crate::types::{Counter, ErrorKind, Gauge, Metric, MetricError, MetricResult, Timer};
use log::{debug, trace};
use std::fmt;
use std::iter;
use std::net::ToSocketAddrs;
use std::panic::RefUnwindSafe;
use std::time::Duration;

/// Conversion trait for valid values for timers
///
/// This trait must be implemented for any types that are used as timer
/// values (currently `i64` and `Duration`). This trait is internal to how
/// values are formatted as part of metrics but is exposed publicly for
/// documentation purposes.
pub trait ToTimerValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToTimerValue for i64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

impl ToTimerValue for Duration {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        let as_millis = self.as_millis();
        if as_millis > u64::MAX as u128 {
            Err(MetricError::from((ErrorKind::InvalidInput, "u64 overflow")))
        } else {
            Ok(MetricValue::Unsigned(as_millis as u64))
        }
    }
}

/// Conversion trait for valid values for gauges
///
/// This trait must be implemented for any types that are used as gauge
/// values (currently only `i64`). This trait is internal to how values are
/// formatted as part of metrics but is exposed publicly for documentation
/// purposes.
pub trait ToGaugeValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToGaugeValue for i64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

/// Magnitude and sample rate applied to every key of a counter operation.
///
/// Defaults to a magnitude of `1` and a sample rate of `1.0` (no sampling).
///
/// # Example
///
/// ```
/// use statsd_pipe::prelude::*;
/// use statsd_pipe::{CounterOptions, SpyMetricSink, StatsdClient};
///
/// let (rx, sink) = SpyMetricSink::new();
/// let client = StatsdClient::from_sink(sink);
///
/// let options = CounterOptions::new().with_magnitude(3);
/// assert!(client.increment(&["requests"], options).unwrap());
/// assert_eq!(b"requests:3|c\n".to_vec(), rx.recv().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterOptions {
    magnitude: i64,
    sample_rate: SampleRate,
}

impl CounterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount to add to each counter.
    pub fn with_magnitude(mut self, magnitude: i64) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Fraction of keys that should actually be sent.
    pub fn with_sample_rate<R>(mut self, rate: R) -> Self
    where
        R: Into<SampleRate>,
    {
        self.sample_rate = rate.into();
        self
    }

    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    // Negative magnitudes are kept as is which also avoids overflowing
    // on i64::MIN.
    fn negated(self) -> Self {
        let magnitude = if self.magnitude < 0 {
            self.magnitude
        } else {
            -self.magnitude
        };

        CounterOptions { magnitude, ..self }
    }
}

impl Default for CounterOptions {
    fn default() -> Self {
        CounterOptions {
            magnitude: 1,
            sample_rate: SampleRate::ALWAYS,
        }
    }
}

/// Trait for incrementing and decrementing counters.
///
/// Counters are simple values incremented or decremented by a client. The
/// rates at which these events occur or average values will be determined
/// by the server receiving them. Examples of counter uses include number
/// of logins to a system or requests received.
///
/// Every key is sampled and sent as its own datagram. The result is `true`
/// if at least one datagram was actually written and `false` if all of
/// them were skipped by sampling or by the error handler ending the call
/// early.
///
/// See the [Statsd spec](https://github.com/b/statsd_spec) for more
/// information.
pub trait Counted {
    /// Add the magnitude of `options` to each of the counters in `keys`.
    fn increment(&self, keys: &[&str], options: CounterOptions) -> MetricResult<bool>;

    /// Subtract the magnitude of `options` from each of the counters in
    /// `keys`. The magnitude is always sent as a negative number, whatever
    /// its sign.
    fn decrement(&self, keys: &[&str], options: CounterOptions) -> MetricResult<bool> {
        self.increment(keys, options.negated())
    }
}

/// Trait for convenience methods for counters
///
/// This trait implements increment and decrement by one for a single key.
pub trait CountedExt: Counted {
    /// Increment the counter by 1
    fn incr(&self, key: &str) -> MetricResult<bool> {
        self.increment(&[key], CounterOptions::default())
    }

    /// Decrement the counter by 1
    fn decr(&self, key: &str) -> MetricResult<bool> {
        self.decrement(&[key], CounterOptions::default())
    }
}

/// Trait for recording timings in milliseconds.
///
/// Timings are a positive number of milliseconds between a start and end
/// time. Examples include time taken to render a web page or time taken
/// for a database call to return. `Duration` values are converted to
/// milliseconds before being recorded.
///
/// The following types are valid for timers:
/// * `i64`
/// * `Duration`
///
/// See the [Statsd spec](https://github.com/b/statsd_spec) for more
/// information.
pub trait Timed<T>
where
    T: ToTimerValue,
{
    /// Record a timing in milliseconds with the given key
    fn time(&self, key: &str, time: T) -> MetricResult<bool> {
        self.time_with(key, time, SampleRate::ALWAYS)
    }

    /// Record a timing in milliseconds with the given key, sampled at the
    /// given rate.
    fn time_with(&self, key: &str, time: T, sample_rate: SampleRate) -> MetricResult<bool>;
}

/// Trait for recording gauge values.
///
/// Gauge values are an instantaneous measurement of a value determined
/// by the client. They do not change unless changed by the client. Examples
/// include things like load average or how many connections are active.
///
/// The following types are valid for gauges:
/// * `i64`
///
/// See the [Statsd spec](https://github.com/b/statsd_spec) for more
/// information.
pub trait Gauged<T>
where
    T: ToGaugeValue,
{
    /// Record a gauge value with the given key
    fn gauge(&self, key: &str, value: T) -> MetricResult<bool> {
        self.gauge_with(key, value, SampleRate::ALWAYS)
    }

    /// Record a gauge value with the given key, sampled at the given rate.
    fn gauge_with(&self, key: &str, value: T, sample_rate: SampleRate) -> MetricResult<bool>;
}

/// Trait that encompasses all other traits for sending metrics.
///
/// If you wish to use `StatsdClient` with a generic type or place a
/// `StatsdClient` instance behind a pointer (such as a `Box`) this will allow
/// you to reference all the implemented methods for recording metrics, while
/// using a single trait. An example of this is shown below.
///
/// ```
/// use std::time::Duration;
/// use statsd_pipe::{MetricClient, StatsdClient, NopMetricSink};
///
/// let client: Box<dyn MetricClient> = Box::new(StatsdClient::from_sink(NopMetricSink));
///
/// client.incr("some.counter").unwrap();
/// client.decr("some.counter").unwrap();
/// client.time("some.timer", 42).unwrap();
/// client.time("some.timer", Duration::from_millis(42)).unwrap();
/// client.gauge("some.gauge", 8).unwrap();
/// ```
pub trait MetricClient: Counted + CountedExt + Timed<i64> + Timed<Duration> + Gauged<i64> {}

/// Typically internal client methods for sending metrics and handling errors.
///
/// This trait exposes methods of the client that would normally be internal
/// but may be useful for consumers of the library to extend it in unforseen
/// ways. Most consumers of the library shouldn't need to make use of this
/// extension point.
///
/// This trait is not exposed in the `prelude` module since it isn't required
/// to use the client for sending metrics. It is only exposed in the `ext`
/// module which is used to encompass advanced extension points for the library.
///
/// NOTE: This is a sealed trait and so it cannot be implemented outside of the
/// library.
///
/// # Example
///
/// ```
/// use statsd_pipe::{Metric, MetricResult, StatsdClient, NopMetricSink};
/// use statsd_pipe::ext::MetricBackend;
///
/// struct CustomMetric {
///     repr: String,
/// }
///
/// impl Metric for CustomMetric {
///     fn as_metric_str(&self) -> &str {
///         &self.repr
///     }
/// }
///
/// struct MyCustomClient {
///     wrapped: StatsdClient,
/// }
///
/// impl MyCustomClient {
///     fn send_event(&self, key: &str, val: i64) -> MetricResult<bool> {
///         let metric = CustomMetric { repr: format!("{}:{}|e", key, val) };
///         match self.wrapped.send_metric(&metric) {
///             Ok(()) => Ok(true),
///             Err(e) => self.wrapped.consume_error(e).map(|_| false),
///         }
///     }
/// }
///
/// let custom = MyCustomClient { wrapped: StatsdClient::from_sink(NopMetricSink) };
/// assert!(custom.send_event("some.event", 123).unwrap());
/// ```
pub trait MetricBackend: Sealed {
    /// Send a full formed `Metric` implementation via the underlying `MetricSink`
    ///
    /// Obtain a `&str` representation of a metric, encode it one byte per
    /// character with a trailing newline, and send it to the underlying
    /// `MetricSink` as a single datagram. Note that the metric is expected to
    /// be full formed already, including any prefix or sample rate.
    fn send_metric<M>(&self, metric: &M) -> MetricResult<()>
    where
        M: Metric;

    /// Consume an error from attempting to send a metric.
    ///
    /// If an error handler was configured, it is invoked and its answer is
    /// returned: `Ok(true)` to keep sending any remaining metrics of the same
    /// call, `Ok(false)` to stop. Without an error handler the error is
    /// returned as is.
    fn consume_error(&self, err: MetricError) -> MetricResult<bool>;
}

type BoxedSink = Box<dyn MetricSink + Sync + Send + RefUnwindSafe>;
type BoxedSampler = Box<dyn Sampler + Sync + Send + RefUnwindSafe>;
type ErrorHandler = Box<dyn Fn(MetricError) -> bool + Sync + Send + RefUnwindSafe>;

/// Builder for creating and customizing `StatsdClient` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `StatsdClient` struct.
///
/// # Example
///
/// ```
/// use statsd_pipe::prelude::*;
/// use statsd_pipe::{MetricError, StatsdClient, NopMetricSink};
///
/// fn my_error_handler(err: MetricError) -> bool {
///     eprintln!("Metric error! {}", err);
///     true
/// }
///
/// let client = StatsdClient::builder(NopMetricSink)
///     .with_prefix("my.app")
///     .with_error_handler(my_error_handler)
///     .build();
///
/// client.incr("something").unwrap();
/// ```
pub struct StatsdClientBuilder {
    prefix: String,
    sink: BoxedSink,
    errors: Option<ErrorHandler>,
    sampler: BoxedSampler,
}

impl StatsdClientBuilder {
    // Set the required fields and defaults for optional fields
    fn new<T>(sink: T) -> Self
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        StatsdClientBuilder {
            // required
            sink: Box::new(sink),

            // optional with defaults
            prefix: String::new(),
            errors: None,
            sampler: Box::new(ThreadRngSampler),
        }
    }

    /// Set a prefix to prepend, followed by a `.`, to every key.
    ///
    /// Any trailing dots on the prefix are removed first. An empty prefix,
    /// the default, means keys are sent exactly as given.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Self::formatted_prefix(prefix);
        self
    }

    /// Set an error handler to invoke when a metric can't be written.
    ///
    /// The handler receives the error and decides what happens to the rest
    /// of the metrics in the same call: returning `true` keeps sending them,
    /// returning `false` stops. When no handler is set, the error is returned
    /// to the caller and the remaining metrics aren't attempted.
    ///
    /// The error handler should consume the error without panicking. The error
    /// may be logged, printed to stderr, discarded, etc. - this is up to the
    /// implementation.
    pub fn with_error_handler<F>(mut self, errors: F) -> Self
    where
        F: Fn(MetricError) -> bool + Sync + Send + RefUnwindSafe + 'static,
    {
        self.errors = Some(Box::new(errors));
        self
    }

    /// Set the source of random draws used for sampled metrics.
    ///
    /// The default is `ThreadRngSampler` which uses the random number
    /// generator of the calling thread.
    pub fn with_sampler<S>(mut self, sampler: S) -> Self
    where
        S: Sampler + Sync + Send + RefUnwindSafe + 'static,
    {
        self.sampler = Box::new(sampler);
        self
    }

    /// Construct a new `StatsdClient` instance based on current settings.
    pub fn build(self) -> StatsdClient {
        StatsdClient::from_builder(self)
    }

    fn formatted_prefix(prefix: &str) -> String {
        let trimmed = prefix.trim_end_matches('.');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}.", trimmed)
        }
    }
}

/// Client for Statsd that implements various traits to record metrics.
///
/// # Traits
///
/// The client is the main entry point for users of this library. It supports
/// several traits for recording metrics of different types.
///
/// * `Counted` and `CountedExt` for emitting counters.
/// * `Timed` for emitting timings.
/// * `Gauged` for emitting gauge values.
/// * `MetricClient` for a combination of all of the above.
///
/// For more information about the uses for each type of metric, see the
/// documentation for each mentioned trait.
///
/// # Threading
///
/// The `StatsdClient` is designed to work in a multithreaded application. All
/// parts of the client can be shared between threads (i.e. it is `Send` and
/// `Sync`). Wrap it with an `Arc` to share it.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::thread;
/// use statsd_pipe::prelude::*;
/// use statsd_pipe::{StatsdClient, DEFAULT_PORT};
///
/// let client = Arc::new(StatsdClient::from_udp_host(("localhost", DEFAULT_PORT)).unwrap());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let client = Arc::clone(&client);
///         thread::spawn(move || {
///             client.incr("request.handler").unwrap();
///         })
///     })
///     .collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
/// ```
///
/// # Closing
///
/// Dropping the client releases its socket. `close()` can be used to release
/// it early, while the client is still shared.
pub struct StatsdClient {
    prefix: String,
    sink: BoxedSink,
    errors: Option<ErrorHandler>,
    sampler: BoxedSampler,
}

impl StatsdClient {
    /// Create a new client instance that will send metrics over UDP to the
    /// given host.
    ///
    /// The socket used is bound to an ephemeral local port and put in
    /// non-blocking mode. No error handler is configured, so every error
    /// sending a metric is returned to the caller.
    ///
    /// # Example
    ///
    /// ```
    /// use statsd_pipe::{StatsdClient, DEFAULT_PORT};
    ///
    /// let client = StatsdClient::from_udp_host(("127.0.0.1", DEFAULT_PORT)).unwrap();
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if the host can't be resolved or a socket
    /// can't be bound.
    pub fn from_udp_host<A>(host: A) -> MetricResult<Self>
    where
        A: ToSocketAddrs,
    {
        let sink = UdpMetricSink::connect(host)?;
        Ok(Self::from_sink(sink))
    }

    /// Create a new client instance that will emit metrics to the given
    /// `MetricSink` implementation, with no prefix and no error handler.
    ///
    /// ```
    /// use statsd_pipe::{StatsdClient, NopMetricSink};
    ///
    /// let client = StatsdClient::from_sink(NopMetricSink);
    /// ```
    pub fn from_sink<T>(sink: T) -> Self
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        Self::builder(sink).build()
    }

    /// Create a new builder with the provided metric sink.
    ///
    /// General defaults:
    ///
    /// * No prefix
    /// * No error handler, errors are returned to callers
    /// * Sampling draws from the random number generator of each thread
    pub fn builder<T>(sink: T) -> StatsdClientBuilder
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        StatsdClientBuilder::new(sink)
    }

    /// Release the underlying socket.
    ///
    /// Safe to call any number of times and never fails. Waits for a metric
    /// being written by another thread to finish. Metrics sent after this
    /// fail with an I/O error, handled like any other send failure.
    pub fn close(&self) {
        self.sink.close();
    }

    // Create a new StatsdClient by consuming the builder
    fn from_builder(builder: StatsdClientBuilder) -> Self {
        StatsdClient {
            prefix: builder.prefix,
            sink: builder.sink,
            errors: builder.errors,
            sampler: builder.sampler,
        }
    }

    /// Sample and send each formatted metric as its own datagram.
    fn submit<'a, M, I>(&self, formatters: I, sample_rate: SampleRate) -> MetricResult<bool>
    where
        M: Metric + From<String>,
        I: IntoIterator<Item = MetricFormatter<'a>>,
    {
        let mut sent = false;

        for mut formatter in formatters {
            match sample_rate.decide(self.sampler.as_ref()) {
                Decision::Rejected => {
                    trace!("skipped {} at sample rate {}", formatter.key(), sample_rate.value());
                    continue;
                }
                Decision::Sampled => formatter.with_sample_rate(sample_rate),
                Decision::Unsampled => {}
            }

            let metric = M::from(formatter.format());
            match self.send_metric(&metric) {
                Ok(()) => sent = true,
                Err(e) => {
                    if !self.consume_error(e)? {
                        debug!("error handler stopped sending after {}", formatter.key());
                        break;
                    }
                }
            }
        }

        Ok(sent)
    }
}

impl Sealed for StatsdClient {}

impl MetricBackend for StatsdClient {
    fn send_metric<M>(&self, metric: &M) -> MetricResult<()>
    where
        M: Metric,
    {
        let datagram = encode_datagram(metric.as_metric_str());
        let written = self.sink.emit(&datagram)?;
        debug!("wrote {} bytes for {}", written, metric.as_metric_str());
        Ok(())
    }

    fn consume_error(&self, err: MetricError) -> MetricResult<bool> {
        match self.errors {
            Some(ref handler) => {
                debug!("passing error to handler: {}", err);
                Ok(handler(err))
            }
            None => Err(err),
        }
    }
}

impl fmt::Debug for StatsdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsdClient {{ prefix: {:?}, sink: ..., errors: {}, sampler: ... }}",
            self.prefix,
            if self.errors.is_some() { "..." } else { "None" },
        )
    }
}

impl Counted for StatsdClient {
    fn increment(&self, keys: &[&str], options: CounterOptions) -> MetricResult<bool> {
        let value = MetricValue::Signed(options.magnitude());
        let formatters = keys
            .iter()
            .map(|key| MetricFormatter::counter(&self.prefix, key, value));

        self.submit::<Counter, _>(formatters, options.sample_rate())
    }
}

impl CountedExt for StatsdClient {}

impl<T> Timed<T> for StatsdClient
where
    T: ToTimerValue,
{
    fn time_with(&self, key: &str, time: T, sample_rate: SampleRate) -> MetricResult<bool> {
        let value = time.try_to_value()?;
        let formatter = MetricFormatter::timer(&self.prefix, key, value);
        self.submit::<Timer, _>(iter::once(formatter), sample_rate)
    }
}

impl<T> Gauged<T> for StatsdClient
where
    T: ToGaugeValue,
{
    fn gauge_with(&self, key: &str, value: T, sample_rate: SampleRate) -> MetricResult<bool> {
        let value = value.try_to_value()?;
        let formatter = MetricFormatter::gauge(&self.prefix, key, value);
        self.submit::<Gauge, _>(iter::once(formatter), sample_rate)
    }
}

impl MetricClient for StatsdClient {}

#[cfg(test)]
mod tests {
    use super::{
        Counted, CountedExt, CounterOptions, Gauged, MetricBackend, MetricClient, StatsdClient,
        StatsdClientBuilder, Timed,
    };
    use crate::sampler::SampleRate;
    use crate::sinks::{NopMetricSink, SpyMetricSink};
    use crate::test::{DelegatingMetricSink, ErrorMetricSink, FixedSampler};
    use crate::types::{ErrorKind, Gauge, Metric, MetricError};
    use crossbeam_channel::Receiver;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn new_spy_client() -> (Receiver<Vec<u8>>, StatsdClient) {
        let (rx, sink) = SpyMetricSink::new();
        (rx, StatsdClient::from_sink(sink))
    }

    fn new_sampled_spy_client(draw: f64) -> (Receiver<Vec<u8>>, StatsdClient) {
        let (rx, sink) = SpyMetricSink::new();
        let client = StatsdClient::builder(sink)
            .with_sampler(FixedSampler::new(draw))
            .build();
        (rx, client)
    }

    fn sent(rx: &Receiver<Vec<u8>>) -> Vec<String> {
        rx.try_iter().map(|v| String::from_utf8(v).unwrap()).collect()
    }

    #[test]
    fn test_statsd_client_incr() {
        let (rx, client) = new_spy_client();
        assert!(client.incr("hits").unwrap());
        assert_eq!(vec!["hits:1|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_decr() {
        let (rx, client) = new_spy_client();
        assert!(client.decr("hits").unwrap());
        assert_eq!(vec!["hits:-1|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_increment_magnitude() {
        let (rx, client) = new_spy_client();
        let options = CounterOptions::new().with_magnitude(7);
        assert!(client.increment(&["some.counter"], options).unwrap());
        assert_eq!(vec!["some.counter:7|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_decrement_forces_negative() {
        let (rx, client) = new_spy_client();
        client.decrement(&["key"], CounterOptions::new().with_magnitude(5)).unwrap();
        client.decrement(&["key"], CounterOptions::new().with_magnitude(-5)).unwrap();
        assert_eq!(vec!["key:-5|c\n", "key:-5|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_decrement_min_magnitude() {
        let (rx, client) = new_spy_client();
        client
            .decrement(&["key"], CounterOptions::new().with_magnitude(i64::MIN))
            .unwrap();
        assert_eq!(vec![format!("key:{}|c\n", i64::MIN)], sent(&rx));
    }

    #[test]
    fn test_statsd_client_increment_negative_magnitude_kept() {
        let (rx, client) = new_spy_client();
        client.increment(&["key"], CounterOptions::new().with_magnitude(-3)).unwrap();
        assert_eq!(vec!["key:-3|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_increment_batch() {
        let (rx, client) = new_spy_client();
        assert!(client.increment(&["a", "b", "c"], CounterOptions::default()).unwrap());
        assert_eq!(vec!["a:1|c\n", "b:1|c\n", "c:1|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_decrement_batch() {
        let (rx, client) = new_spy_client();
        let options = CounterOptions::new().with_magnitude(2);
        assert!(client.decrement(&["a", "b"], options).unwrap());
        assert_eq!(vec!["a:-2|c\n", "b:-2|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_increment_no_keys() {
        let (rx, client) = new_spy_client();
        assert!(!client.increment(&[], CounterOptions::default()).unwrap());
        assert!(sent(&rx).is_empty());
    }

    #[test]
    fn test_statsd_client_gauge() {
        let (rx, client) = new_spy_client();
        assert!(client.gauge("cpu", 42).unwrap());
        assert_eq!(vec!["cpu:42|g\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_time() {
        let (rx, client) = new_spy_client();
        assert!(client.time("db.query", 25).unwrap());
        assert_eq!(vec!["db.query:25|ms\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_time_duration() {
        let (rx, client) = new_spy_client();
        assert!(client.time("db.query", Duration::from_millis(35)).unwrap());
        assert_eq!(vec!["db.query:35|ms\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_time_duration_overflow() {
        let (rx, client) = new_spy_client();
        let res = client.time("db.query", Duration::from_secs(u64::MAX));
        assert_eq!(ErrorKind::InvalidInput, res.unwrap_err().kind());
        assert!(sent(&rx).is_empty());
    }

    #[test]
    fn test_statsd_client_with_prefix() {
        let (rx, sink) = SpyMetricSink::new();
        let client = StatsdClient::builder(sink).with_prefix("my.app...").build();
        client.incr("hits").unwrap();
        assert_eq!(vec!["my.app.hits:1|c\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_builder_formatted_prefix() {
        assert_eq!("", StatsdClientBuilder::formatted_prefix(""));
        assert_eq!("", StatsdClientBuilder::formatted_prefix("."));
        assert_eq!("app.", StatsdClientBuilder::formatted_prefix("app"));
        assert_eq!("app.", StatsdClientBuilder::formatted_prefix("app."));
    }

    #[test]
    fn test_statsd_client_unsampled_rate_has_no_suffix() {
        let (rx, client) = new_sampled_spy_client(0.99);
        client.gauge_with("cpu", 42, SampleRate::new(1.0)).unwrap();
        client.gauge_with("cpu", 42, SampleRate::new(2.5)).unwrap();
        assert_eq!(vec!["cpu:42|g\n", "cpu:42|g\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_sampled_in() {
        let (rx, client) = new_sampled_spy_client(0.25);
        assert!(client.gauge_with("cpu", 42, SampleRate::new(0.5)).unwrap());
        assert_eq!(vec!["cpu:42|g|@0.50\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_sampled_out() {
        let (rx, client) = new_sampled_spy_client(0.75);
        assert!(!client.time_with("db.query", 12, SampleRate::new(0.5)).unwrap());
        assert!(sent(&rx).is_empty());
    }

    #[test]
    fn test_statsd_client_sample_rate_zero_never_sends() {
        let (rx, client) = new_sampled_spy_client(0.0);
        let options = CounterOptions::new().with_sample_rate(0.0);
        assert!(!client.increment(&["a", "b"], options).unwrap());

        let options = CounterOptions::new().with_sample_rate(-0.5);
        assert!(!client.increment(&["a", "b"], options).unwrap());
        assert!(sent(&rx).is_empty());
    }

    #[test]
    fn test_statsd_client_sampled_batch() {
        let (rx, client) = new_sampled_spy_client(0.1);
        let options = CounterOptions::new().with_sample_rate(0.25);
        assert!(client.increment(&["a", "b"], options).unwrap());
        assert_eq!(vec!["a:1|c|@0.25\n", "b:1|c|@0.25\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_no_handler_returns_error_immediately() {
        let sink = Arc::new(ErrorMetricSink::always());
        let client = StatsdClient::from_sink(DelegatingMetricSink::new(sink.clone()));

        let res = client.increment(&["a", "b", "c"], CounterOptions::default());
        assert_eq!(ErrorKind::IoError, res.unwrap_err().kind());
        assert_eq!(1, sink.attempts());
    }

    #[test]
    fn test_statsd_client_handler_continues_batch() {
        let sink = Arc::new(ErrorMetricSink::always());
        let calls = Arc::new(AtomicUsize::new(0));
        let handler_calls = calls.clone();
        let client = StatsdClient::builder(DelegatingMetricSink::new(sink.clone()))
            .with_error_handler(move |_e| {
                handler_calls.fetch_add(1, Ordering::SeqCst);
                true
            })
            .build();

        let res = client.increment(&["a", "b", "c"], CounterOptions::default());
        assert!(!res.unwrap());
        assert_eq!(3, sink.attempts());
        assert_eq!(3, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn test_statsd_client_handler_aborts_batch() {
        let sink = Arc::new(ErrorMetricSink::always());
        let client = StatsdClient::builder(DelegatingMetricSink::new(sink.clone()))
            .with_error_handler(|_e| false)
            .build();

        let res = client.increment(&["a", "b", "c"], CounterOptions::default());
        assert!(!res.unwrap());
        assert_eq!(1, sink.attempts());
    }

    #[test]
    fn test_statsd_client_handler_partial_success() {
        let sink = Arc::new(ErrorMetricSink::matching("b:"));
        let client = StatsdClient::builder(DelegatingMetricSink::new(sink.clone()))
            .with_error_handler(|_e| false)
            .build();

        let res = client.increment(&["a", "b", "c"], CounterOptions::default());
        assert!(res.unwrap());
        assert_eq!(2, sink.attempts());
    }

    #[test]
    fn test_statsd_client_handler_receives_io_error() {
        let sink = ErrorMetricSink::always();
        let client = StatsdClient::builder(sink)
            .with_error_handler(|e: MetricError| e.kind() == ErrorKind::IoError && e.io_error().is_some())
            .build();

        // The handler returns true only for the error kind we expect, which
        // lets the batch run to completion.
        let res = client.increment(&["a"], CounterOptions::default());
        assert!(!res.unwrap());
    }

    #[test]
    fn test_statsd_client_send_metric() {
        let (rx, client) = new_spy_client();
        let gauge = Gauge::new("", "custom", 3);
        client.send_metric(&gauge).unwrap();
        assert_eq!("custom:3|g", gauge.as_metric_str());
        assert_eq!(vec!["custom:3|g\n"], sent(&rx));
    }

    #[test]
    fn test_statsd_client_consume_error_without_handler() {
        let client = StatsdClient::from_sink(NopMetricSink);
        let err = MetricError::from((ErrorKind::InvalidInput, "bad"));
        assert_eq!(ErrorKind::InvalidInput, client.consume_error(err).unwrap_err().kind());
    }

    #[test]
    fn test_statsd_client_close_routes_send_through_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler_calls = calls.clone();
        let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let sink = crate::sinks::UdpMetricSink::from("127.0.0.1:8125", socket).unwrap();
        let client = StatsdClient::builder(sink)
            .with_error_handler(move |_e| {
                handler_calls.fetch_add(1, Ordering::SeqCst);
                true
            })
            .build();

        client.close();
        client.close();

        assert!(!client.incr("hits").unwrap());
        assert_eq!(1, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn test_statsd_client_debug() {
        let client = StatsdClient::builder(NopMetricSink).with_prefix("app").build();
        let repr = format!("{:?}", client);
        assert!(repr.contains("\"app.\""));
        assert!(repr.contains("errors: None"));
    }

    #[test]
    fn test_statsd_client_as_metric_client() {
        let client: Box<dyn MetricClient> = Box::new(StatsdClient::from_sink(NopMetricSink));
        assert!(client.incr("some.counter").unwrap());
        assert!(client.gauge("some.gauge", 4).unwrap());
        assert!(client.time("some.timer", Duration::from_millis(4)).unwrap());
    }

    #[test]
    fn test_statsd_client_shared_between_threads() {
        let (rx, sink) = SpyMetricSink::new();
        let client = Arc::new(StatsdClient::from_sink(sink));

        let threads: Vec<_> = (0..4)
            .map(|_| {
                let local = Arc::clone(&client);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        local.incr("hits").unwrap();
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        let lines = sent(&rx);
        assert_eq!(100, lines.len());
        assert!(lines.iter().all(|l| l == "hits:1|c\n"));
    }

    #[test]
    fn test_counter_options_default() {
        let options = CounterOptions::default();
        assert_eq!(1, options.magnitude());
        assert_eq!(SampleRate::ALWAYS, options.sample_rate());
    }
}
