//! Radix-tree request router with a middleware chain in front.
//!
//! One tree per HTTP method. O(path-length) lookup. Every request passes
//! through the attached [`Chain`] first; its outcome decides whether the
//! tree is consulted at all.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Chain, MiddlewareResponse, RequestEvent};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    chain: Chain,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), chain: Chain::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax:
    ///
    /// ```rust
    /// # use taskdeck::{Method, Request, Response, Router};
    /// # async fn get_task(_: Request) -> Response { Response::text("") }
    /// # async fn create_task(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/api/tasks/{id}", get_task)
    ///     .on(Method::Post, "/api/tasks",      create_task);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this surfaces
    /// on the first run.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Installs the chain every request passes through before routing.
    /// Replaces any previously installed chain.
    pub fn middleware(mut self, chain: Chain) -> Self {
        self.chain = chain;
        self
    }

    /// Runs the middleware chain, then the matched handler.
    ///
    /// - `Next` routes the request and appends the middleware headers.
    /// - `Rewrite` routes the rewritten path instead.
    /// - `Redirect` and `Respond` answer without consulting the tree.
    pub async fn handle(&self, mut req: Request, event: &RequestEvent) -> Response {
        match self.chain.run(&mut req, event).await {
            MiddlewareResponse::Next { headers } => {
                self.route(req).await.with_headers(headers)
            }
            MiddlewareResponse::Rewrite { path, headers } => {
                debug!(from = req.path(), to = %path, "rewrite");
                req.set_path(path);
                self.route(req).await.with_headers(headers)
            }
            MiddlewareResponse::Redirect { location, status, headers } => {
                Response::redirect(&location, status).with_headers(headers)
            }
            MiddlewareResponse::Respond(res) => res,
        }
    }

    async fn route(&self, mut req: Request) -> Response {
        match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => {
                req.set_params(params);
                handler.call(req).await
            }
            None => Response::status(Status::NotFound),
        }
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{self, Next};
    use crate::BoxFuture;

    async fn show_task(req: Request) -> Response {
        Response::text(format!("task {}", req.param("id").unwrap_or("?")))
    }

    fn app() -> Router {
        Router::new().on(Method::Get, "/api/tasks/{id}", show_task)
    }

    fn legacy_paths<'a>(
        req: &'a mut Request,
        next: Next,
        _ev: &'a RequestEvent,
    ) -> BoxFuture<'a, MiddlewareResponse> {
        Box::pin(async move {
            match req.path().strip_prefix("/tasks/") {
                Some(id) => MiddlewareResponse::rewrite(format!("/api/tasks/{id}")),
                None => next.run(),
            }
        })
    }

    #[tokio::test]
    async fn routes_with_params() {
        let res = app().handle(Request::new(Method::Get, "/api/tasks/9"), &RequestEvent::default()).await;
        assert_eq!(res.body(), b"task 9");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let res = app().handle(Request::new(Method::Post, "/api/tasks/9"), &RequestEvent::default()).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn rewrite_routes_the_new_path() {
        let router = app().middleware(Chain::new().with(middleware::from_fn(legacy_paths)));
        let res = router.handle(Request::new(Method::Get, "/tasks/4"), &RequestEvent::default()).await;
        assert_eq!(res.body(), b"task 4");
    }

    #[tokio::test]
    async fn redirect_skips_the_tree() {
        let router = app().middleware(Chain::new().with(middleware::RequireSession::new("sid")));
        let res = router.handle(Request::new(Method::Get, "/board"), &RequestEvent::default()).await;
        assert_eq!(res.status_code(), 307);
        assert_eq!(res.header("location"), Some("/login?next=%2Fboard"));
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = app().on(Method::Get, "/api/tasks/{id}", show_task);
    }
}
