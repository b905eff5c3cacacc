use statsd_pipe::prelude::*;
use statsd_pipe::{CounterOptions, SampleRate, StatsdClient};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[allow(dead_code)]
pub const NUM_THREADS: u64 = 100;
#[allow(dead_code)]
pub const NUM_ITERATIONS: u64 = 1_000;

/// Record every kind of metric from several threads sharing one client,
/// returning once all of them are done.
#[allow(dead_code)]
pub fn run_arc_threaded_test(client: StatsdClient, num_threads: u64, iterations: u64) {
    let shared_client = Arc::new(client);

    let threads: Vec<_> = (0..num_threads)
        .map(|_| {
            let local_client = Arc::clone(&shared_client);

            thread::spawn(move || {
                for i in 0..iterations {
                    let options = CounterOptions::new().with_magnitude(i as i64);
                    local_client.increment(&["some.counter", "other.counter"], options).unwrap();
                    local_client.decr("some.counter").unwrap();
                    local_client.time("some.timer", i as i64).unwrap();
                    local_client.time("some.timer", Duration::from_millis(i)).unwrap();
                    local_client.gauge("some.gauge", i as i64).unwrap();
                    local_client
                        .gauge_with("some.gauge", i as i64, SampleRate::new(0.5))
                        .unwrap();
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }
}
