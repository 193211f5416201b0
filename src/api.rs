//! Request/response surface over the engine.
//!
//! [`Router`] maps `(method, url, body)` to a status and JSON body and is
//! usable without any transport; [`HttpServer`] puts it on a socket.

mod http;
mod router;
pub mod wire;

pub use http::HttpServer;
pub use router::{ApiResponse, Router};
