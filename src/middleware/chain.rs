use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{Malformed, Middleware, MiddlewareResponse, RequestEvent};
use crate::handler::BoxFuture;
use crate::request::Request;

/// A type-erased middleware, for building chains from mixed entries.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// The already-resolved result of every handler inside the current one.
///
/// Calling [`run`](Next::run) does not execute anything: the inner handlers
/// finished before the current one was called.
#[derive(Debug)]
pub struct Next {
    resolved: MiddlewareResponse,
}

impl Next {
    pub(crate) fn resolved(resolved: MiddlewareResponse) -> Self {
        Self { resolved }
    }

    /// Passes the inner result through.
    pub fn run(self) -> MiddlewareResponse {
        self.resolved
    }

    /// Inspects the inner result without taking it.
    pub fn peek(&self) -> &MiddlewareResponse {
        &self.resolved
    }
}

#[derive(Clone)]
struct Entry {
    name: Cow<'static, str>,
    middleware: BoxedMiddleware,
}

/// An ordered middleware chain composed into a single handler.
///
/// Build it once at startup and attach it with
/// [`Router::middleware`](crate::Router::middleware). A `Chain` is itself a
/// [`Middleware`], so chains nest.
#[derive(Clone, Default)]
pub struct Chain {
    entries: Vec<Entry>,
}

impl Chain {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Builds a chain from optional entries. `None` entries (middleware
    /// switched off by configuration) are dropped here, so the result is
    /// identical to a chain built from the `Some` entries alone.
    pub fn from_entries(entries: impl IntoIterator<Item = Option<BoxedMiddleware>>) -> Self {
        entries.into_iter().fold(Self::new(), |chain, entry| match entry {
            Some(mw) => {
                let name = Cow::Owned(mw.name().to_owned());
                chain.push(name, mw)
            }
            None => {
                debug!(position = chain.len(), "skipping empty middleware entry");
                chain
            }
        })
    }

    /// Appends `mw` as the new innermost handler.
    pub fn with(self, mw: impl Middleware) -> Self {
        let name = Cow::Owned(mw.name().to_owned());
        self.push(name, Arc::new(mw))
    }

    /// Like [`with`](Chain::with), with an explicit diagnostic name.
    pub fn named(self, name: impl Into<Cow<'static, str>>, mw: impl Middleware) -> Self {
        self.push(name.into(), Arc::new(mw))
    }

    /// Appends `mw` if present; `None` leaves the chain unchanged.
    pub fn with_opt(self, mw: Option<impl Middleware>) -> Self {
        match mw {
            Some(mw) => self.with(mw),
            None => self,
        }
    }

    fn push(mut self, name: Cow<'static, str>, middleware: BoxedMiddleware) -> Self {
        self.entries.push(Entry { name, middleware });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostic names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_ref())
    }

    /// Runs the chain for one request.
    ///
    /// An empty chain answers the default pass-through immediately.
    pub async fn run(&self, req: &mut Request, event: &RequestEvent) -> MiddlewareResponse {
        self.run_from(MiddlewareResponse::next(), req, event).await
    }

    /// Folds the handlers in reverse registration order, starting from
    /// `innermost`. Each handler is awaited before the next outer one runs.
    async fn run_from(
        &self,
        innermost: MiddlewareResponse,
        req: &mut Request,
        event: &RequestEvent,
    ) -> MiddlewareResponse {
        let mut resolved = innermost;
        for entry in self.entries.iter().rev() {
            let next = Next::resolved(resolved);
            resolved = match entry.middleware.call(req, next, event).await {
                Ok(res) => res,
                Err(malformed) => {
                    warn!(
                        middleware = %entry.name,
                        request_id = event.request_id(),
                        reason = %malformed,
                        "middleware returned a malformed response, passing through"
                    );
                    MiddlewareResponse::next()
                }
            };
        }
        resolved
    }
}

impl Middleware for Chain {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        next: Next,
        event: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, Malformed>> {
        Box::pin(async move { Ok(self.run_from(next.run(), req, event).await) })
    }

    fn name(&self) -> &str {
        "chain"
    }
}
