// Statsd Pipe - A small Statsd client for Rust!
//
// Copyright 2026 Statsd Pipe Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use log::debug;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::sinks::core::MetricSink;
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Attempt to convert anything implementing the `ToSocketAddrs` trait
/// into a concrete `SocketAddr` instance, returning an `InvalidInput`
/// error if the address could not be parsed.
#[allow(clippy::needless_pass_by_value)]
fn get_addr<A: ToSocketAddrs>(addr: A) -> MetricResult<SocketAddr> {
    match addr.to_socket_addrs()?.next() {
        Some(addr) => Ok(addr),
        None => Err(MetricError::from((
            ErrorKind::InvalidInput,
            "No socket addresses yielded",
        ))),
    }
}

/// Wildcard local address, with an ephemeral port, in the same family as
/// the remote address.
fn local_addr_for(remote: &SocketAddr) -> SocketAddr {
    match remote {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}

/// Implementation of a `MetricSink` that emits metrics over UDP.
///
/// Each datagram is sent to the Statsd server when the `.emit()` method is
/// called, in the thread of the caller. Sends are serialized by a lock held
/// only for the duration of a single write, so the sink can be shared by any
/// number of threads.
///
/// Closing the sink takes the same lock, so it waits for a send that is in
/// progress and every later send fails with `NotConnected`.
#[derive(Debug)]
pub struct UdpMetricSink {
    addr: SocketAddr,
    socket: Mutex<Option<UdpSocket>>,
}

impl UdpMetricSink {
    /// Resolve the address of a Statsd server and bind a new socket to
    /// send metrics to it.
    ///
    /// The socket is bound to an ephemeral port on the wildcard address of
    /// the same family as the server, and is put in non-blocking mode.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use statsd_pipe::{UdpMetricSink, DEFAULT_PORT};
    ///
    /// let sink = UdpMetricSink::connect(("metrics.example.com", DEFAULT_PORT)).unwrap();
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed.
    /// * A local socket cannot be bound.
    pub fn connect<A>(to_addr: A) -> MetricResult<UdpMetricSink>
    where
        A: ToSocketAddrs,
    {
        let addr = get_addr(to_addr)?;
        let socket = UdpSocket::bind(local_addr_for(&addr))?;
        socket.set_nonblocking(true)?;
        debug!("bound {:?} to send metrics to {}", socket.local_addr().ok(), addr);
        Ok(UdpMetricSink::with_addr(addr, socket))
    }

    /// Construct a new `UdpMetricSink` instance from an existing socket.
    ///
    /// The address should be the address of the remote metric server to
    /// emit metrics to over UDP. The socket should already be bound to a
    /// local address with any desired configuration applied (blocking vs
    /// non-blocking, timeouts, etc.).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::net::UdpSocket;
    /// use std::time::Duration;
    /// use statsd_pipe::{UdpMetricSink, DEFAULT_PORT};
    ///
    /// let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
    /// socket.set_write_timeout(Some(Duration::from_millis(1))).unwrap();
    /// let host = ("metrics.example.com", DEFAULT_PORT);
    /// let sink = UdpMetricSink::from(host, socket);
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed.
    pub fn from<A>(to_addr: A, socket: UdpSocket) -> MetricResult<UdpMetricSink>
    where
        A: ToSocketAddrs,
    {
        let addr = get_addr(to_addr)?;
        Ok(UdpMetricSink::with_addr(addr, socket))
    }

    fn with_addr(addr: SocketAddr, socket: UdpSocket) -> UdpMetricSink {
        UdpMetricSink {
            addr,
            socket: Mutex::new(Some(socket)),
        }
    }

    /// Address of the Statsd server metrics are sent to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// True once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.socket().is_none()
    }

    // The guarded socket can't be left in a broken state by a panic in
    // another thread, so a poisoned lock is used as is.
    fn socket(&self) -> MutexGuard<'_, Option<UdpSocket>> {
        self.socket.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MetricSink for UdpMetricSink {
    fn emit(&self, datagram: &[u8]) -> io::Result<usize> {
        match *self.socket() {
            Some(ref socket) => socket.send_to(datagram, self.addr),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "UDP metric sink is closed",
            )),
        }
    }

    fn close(&self) {
        if let Some(socket) = self.socket().take() {
            debug!("closing socket for metrics sent to {}", self.addr);
            drop(socket);
        }
    }
}
