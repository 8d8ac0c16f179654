//! # taskdeck
//!
//! The request-side core of a task-management backend: a middleware chain in
//! front of a small HTTP router, a controller for inline-edited task fields,
//! and environment-driven feature flags.
//!
//! What lives elsewhere: persistence, token signing, password hashing and
//! rate limiting are collaborators the route handlers call into. taskdeck
//! only decides which handler runs, with which request, and whether a
//! feature is on.
//!
//! - [`middleware`]: ordered request interception with rewrite, redirect and
//!   short-circuit outcomes
//! - [`inline_edit`]: the read/edit/save/cancel lifecycle of one field
//! - [`flags`]: override → environment → default flag resolution
//! - [`Router`] / [`Server`]: radix-tree routing over hyper, graceful shutdown
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use taskdeck::flags::FeatureFlags;
//! use taskdeck::middleware::{self, Chain};
//! use taskdeck::{Config, Method, Request, Response, Router, Server, health};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), taskdeck::Error> {
//!     let config = Config::from_process_env()?;
//!     let flags = FeatureFlags::from_process_env();
//!
//!     let chain = Chain::new()
//!         .with(middleware::Trace)
//!         .with(middleware::RequireSession::new("session"));
//!
//!     let app = Router::new()
//!         .on(Method::Get, "/api/tasks/{id}", get_task)
//!         .on(Method::Get, "/api/flags", health::flags(flags))
//!         .middleware(chain);
//!
//!     Server::from_addr(config.addr).serve(app).await
//! }
//!
//! async fn get_task(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod flags;
pub mod health;
pub mod inline_edit;
pub mod middleware;

pub use config::Config;
pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
