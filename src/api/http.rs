//! Blocking JSON-over-HTTP transport.
//!
//! A fixed pool of worker threads pulls requests off one listener and
//! hands them to the [`Router`]. An optional sweeper thread ticks every
//! profile on an interval. All threads stop once [`HttpServer::shutdown`]
//! is called.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, info, warn};

use crate::api::router::{ApiResponse, Router};
use crate::error::EngineError;

const POLL: Duration = Duration::from_millis(200);

/// Listener plus the router it serves.
pub struct HttpServer {
    server: Server,
    router: Router,
    stop: AtomicBool,
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("addr", &self.local_addr())
            .finish_non_exhaustive()
    }
}

impl HttpServer {
    /// Bind to `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn bind(addr: &str, router: Router) -> io::Result<Self> {
        let server = Server::http(addr).map_err(io::Error::other)?;
        Ok(Self {
            server,
            router,
            stop: AtomicBool::new(false),
        })
    }

    /// Bound socket address.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Ask every thread started by [`HttpServer::run`] to exit.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Serve until [`HttpServer::shutdown`]; blocks the caller.
    ///
    /// `sweep_interval` of zero disables the background energy sweep.
    pub fn run(&self, workers: usize, sweep_interval: Duration) {
        info!(addr = ?self.local_addr(), workers, "serving");
        thread::scope(|scope| {
            for _ in 0..workers.max(1) {
                scope.spawn(|| self.worker());
            }
            if !sweep_interval.is_zero() {
                scope.spawn(|| self.sweeper(sweep_interval));
            }
        });
        info!("server stopped");
    }

    fn worker(&self) {
        while !self.stop.load(Ordering::SeqCst) {
            match self.server.recv_timeout(POLL) {
                Ok(Some(request)) => self.respond(request),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "accept failed");
                }
            }
        }
    }

    fn sweeper(&self, interval: Duration) {
        let engine = Arc::clone(self.router.engine());
        let mut waited = Duration::ZERO;
        while !self.stop.load(Ordering::SeqCst) {
            thread::sleep(POLL.min(interval));
            waited += POLL.min(interval);
            if waited < interval {
                continue;
            }
            waited = Duration::ZERO;
            if let Err(e) = engine.sweep() {
                warn!(error = %e, "energy sweep failed");
            }
        }
    }

    fn respond(&self, mut request: Request) {
        let mut body = String::new();
        let reply = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => self
                .router
                .handle(request.method().as_str(), request.url(), &body),
            Err(e) => ApiResponse::from_error(&EngineError::invalid(format!("unreadable body: {e}"))),
        };
        debug!(status = reply.status, url = request.url(), "response");

        let mut response =
            Response::from_string(reply.body.to_string()).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            response = response.with_header(header);
        }
        if let Err(e) = request.respond(response) {
            warn!(error = %e, "failed to write response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::EconomyConfig;
    use crate::engine::Engine;
    use crate::rng::SeededRolls;
    use crate::store::MemoryStore;
    use std::io::{Read, Write};
    use std::net::TcpStream;

    #[test]
    fn test_serves_json_over_socket() {
        let engine = Engine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(0)),
            Box::new(SeededRolls::new(3)),
            EconomyConfig::default(),
        );
        let server = HttpServer::bind("127.0.0.1:0", Router::new(Arc::new(engine))).unwrap();
        let addr = server.local_addr().unwrap();

        thread::scope(|scope| {
            scope.spawn(|| server.run(1, Duration::ZERO));

            let mut stream = TcpStream::connect(addr).unwrap();
            write!(
                stream,
                "GET /mission?level=1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
            )
            .unwrap();
            let mut reply = String::new();
            stream.read_to_string(&mut reply).unwrap();
            server.shutdown();

            assert!(reply.starts_with("HTTP/1.1 200"));
            assert!(reply.contains("application/json"));
            assert!(reply.contains("\"enemyHp\":12"));
        });
    }
}
