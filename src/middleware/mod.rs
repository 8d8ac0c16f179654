//! Middleware layer.
//!
//! Middleware intercepts every request before it reaches the router and is
//! the place for cross-cutting concerns: tracing, session gating, path
//! rewrites and redirects.
//!
//! A [`Chain`] composes handlers registered in order `[h1, h2, …, hn]`.
//! `h1` is the outermost layer and `hn` the innermost, but the chain is
//! **eager**: it folds from the inside out, so `hn` runs first against the
//! default pass-through response, then `hn-1` runs with a [`Next`] holding
//! what `hn` produced, and so on until `h1` runs last.
//!
//! ```text
//! register:  h1  h2  h3
//! execute:   h3 → h2 → h1         (each sees the resolved inner result)
//! next.run() returns that result; it never triggers downstream work
//! ```
//!
//! An outer handler that returns early therefore cannot prevent the side
//! effects of the handlers registered after it. Order session gating and
//! similar guards accordingly (innermost = registered last).
//!
//! ```rust
//! use taskdeck::middleware::{self, Chain, MiddlewareResponse, Next, RequestEvent};
//! use taskdeck::{BoxFuture, Request};
//!
//! fn tag<'a>(req: &'a mut Request, next: Next, _ev: &'a RequestEvent) -> BoxFuture<'a, MiddlewareResponse> {
//!     Box::pin(async move {
//!         req.set_header("x-tagged", "1");
//!         next.run().with_header("x-served-by", "taskdeck")
//!     })
//! }
//!
//! let chain = Chain::new()
//!     .with(middleware::Trace)
//!     .with(middleware::from_fn(tag));
//! ```

mod chain;
mod event;
mod outcome;
mod session;
mod trace;

use std::fmt;

pub use chain::{BoxedMiddleware, Chain, Next};
pub use event::RequestEvent;
pub use outcome::MiddlewareResponse;
pub use session::RequireSession;
pub use trace::Trace;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// A request-intercepting handler.
///
/// Implement it on a struct for configurable middleware, or wrap a plain
/// function with [`from_fn`].
pub trait Middleware: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        next: Next,
        event: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, Malformed>>;

    /// Identifies the handler in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// ── Return-value conversion ───────────────────────────────────────────────────

/// A handler return value that is not a usable response.
///
/// The chain never propagates one: it logs the reason together with the
/// handler's name and substitutes [`MiddlewareResponse::next`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Malformed {
    reason: String,
}

impl Malformed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Values a middleware function may return.
pub trait IntoMiddlewareResponse {
    fn into_middleware_response(self) -> Result<MiddlewareResponse, Malformed>;
}

impl IntoMiddlewareResponse for MiddlewareResponse {
    fn into_middleware_response(self) -> Result<MiddlewareResponse, Malformed> {
        Ok(self)
    }
}

/// A plain response is terminal.
impl IntoMiddlewareResponse for Response {
    fn into_middleware_response(self) -> Result<MiddlewareResponse, Malformed> {
        Ok(MiddlewareResponse::Respond(self))
    }
}

impl IntoMiddlewareResponse for Status {
    fn into_middleware_response(self) -> Result<MiddlewareResponse, Malformed> {
        Ok(MiddlewareResponse::Respond(Response::status(self)))
    }
}

/// A handler that neither called `next` nor produced a response.
impl IntoMiddlewareResponse for () {
    fn into_middleware_response(self) -> Result<MiddlewareResponse, Malformed> {
        Err(Malformed::new("handler returned no response"))
    }
}

impl<T: IntoMiddlewareResponse> IntoMiddlewareResponse for Option<T> {
    fn into_middleware_response(self) -> Result<MiddlewareResponse, Malformed> {
        match self {
            Some(v) => v.into_middleware_response(),
            None => Err(Malformed::new("handler returned None")),
        }
    }
}

impl<T, E> IntoMiddlewareResponse for Result<T, E>
where
    T: IntoMiddlewareResponse,
    E: fmt::Display,
{
    fn into_middleware_response(self) -> Result<MiddlewareResponse, Malformed> {
        match self {
            Ok(v) => v.into_middleware_response(),
            Err(e) => Err(Malformed::new(format!("handler failed: {e}"))),
        }
    }
}

// ── Function middleware ───────────────────────────────────────────────────────

/// Wraps a function or closure as [`Middleware`].
///
/// The function borrows the request for the duration of its future, so it
/// returns a [`BoxFuture`]:
///
/// ```rust
/// use taskdeck::middleware::{from_fn, MiddlewareResponse};
///
/// let legacy = from_fn(|req, next, _ev| Box::pin(async move {
///     if req.path().starts_with("/projects") {
///         let path = req.path().replacen("/projects", "/workspaces/default/projects", 1);
///         return MiddlewareResponse::rewrite(path);
///     }
///     next.run()
/// }));
/// ```
pub fn from_fn<F, R>(f: F) -> FromFn<F>
where
    F: for<'a> Fn(&'a mut Request, Next, &'a RequestEvent) -> BoxFuture<'a, R> + Send + Sync + 'static,
    R: IntoMiddlewareResponse + 'static,
{
    FromFn(f)
}

/// Middleware built by [`from_fn`]. Named after the wrapped function's type.
pub struct FromFn<F>(F);

impl<F, R> Middleware for FromFn<F>
where
    F: for<'a> Fn(&'a mut Request, Next, &'a RequestEvent) -> BoxFuture<'a, R> + Send + Sync + 'static,
    R: IntoMiddlewareResponse + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        next: Next,
        event: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, Malformed>> {
        let fut = (self.0)(req, next, event);
        Box::pin(async move { fut.await.into_middleware_response() })
    }

    fn name(&self) -> &str {
        std::any::type_name::<F>()
    }
}
