use tracing::debug;
use url::form_urlencoded::byte_serialize;

use super::{Malformed, Middleware, MiddlewareResponse, Next, RequestEvent};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Sends requests without a session cookie to the login page.
///
/// Public prefixes pass through untouched. Under the API prefix a missing
/// session is a `401` JSON body instead of a redirect, since fetch clients
/// cannot follow a redirect to an HTML page.
///
/// The cookie is only checked for presence; verifying the token belongs to
/// the route handlers.
#[derive(Clone, Debug)]
pub struct RequireSession {
    cookie: String,
    login_path: String,
    api_prefix: String,
    public: Vec<String>,
}

impl RequireSession {
    pub fn new(cookie: impl Into<String>) -> Self {
        let login_path = "/login".to_owned();
        Self {
            cookie: cookie.into(),
            public: vec![
                login_path.clone(),
                "/register".to_owned(),
                "/api/auth".to_owned(),
                "/healthz".to_owned(),
                "/readyz".to_owned(),
            ],
            login_path,
            api_prefix: "/api".to_owned(),
        }
    }

    /// Where browsers are redirected. The path replaces the previous login
    /// path among the public prefixes.
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        match self.public.iter_mut().find(|p| **p == self.login_path) {
            Some(old) => *old = path.clone(),
            None => self.public.push(path.clone()),
        }
        self.login_path = path;
        self
    }

    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Marks `prefix` (and everything below it) as reachable without a session.
    pub fn allow(mut self, prefix: impl Into<String>) -> Self {
        self.public.push(prefix.into());
        self
    }

    fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|p| under(path, p))
    }

    fn has_session(&self, req: &Request) -> bool {
        req.cookie(&self.cookie).is_some_and(|v| !v.is_empty())
    }

    fn decide(&self, req: &Request, next: Next) -> MiddlewareResponse {
        if self.is_public(req.path()) || self.has_session(req) {
            return next.run();
        }

        debug!(path = req.path(), "no session cookie");
        if under(req.path(), &self.api_prefix) {
            let body = serde_json::json!({ "error": "unauthorized" });
            let res = Response::builder()
                .status(Status::Unauthorized)
                .json(body.to_string().into_bytes());
            return MiddlewareResponse::respond(res);
        }

        let target = match req.query() {
            Some(q) => format!("{}?{q}", req.path()),
            None => req.path().to_owned(),
        };
        let next: String = byte_serialize(target.as_bytes()).collect();
        MiddlewareResponse::redirect(format!("{}?next={next}", self.login_path))
    }
}

impl Middleware for RequireSession {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        next: Next,
        _event: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, Malformed>> {
        Box::pin(async move { Ok(self.decide(req, next)) })
    }

    fn name(&self) -> &str {
        "require_session"
    }
}

/// Segment-aware prefix match: `/api` covers `/api` and `/api/tasks`, not `/apiary`.
fn under(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    async fn decide(guard: &RequireSession, req: &Request) -> MiddlewareResponse {
        let mut req = req.clone();
        let next = Next::resolved(MiddlewareResponse::next());
        guard.call(&mut req, next, &RequestEvent::default()).await.unwrap()
    }

    #[test]
    fn prefix_match_respects_segments() {
        assert!(under("/api", "/api"));
        assert!(under("/api/tasks", "/api"));
        assert!(!under("/apiary", "/api"));
        assert!(under("/anything", "/"));
    }

    #[tokio::test]
    async fn public_paths_pass_through() {
        let guard = RequireSession::new("session");
        let req = Request::new(Method::Get, "/login");
        assert!(decide(&guard, &req).await.is_pass_through());
    }

    #[tokio::test]
    async fn session_cookie_passes_through() {
        let guard = RequireSession::new("session");
        let req = Request::new(Method::Get, "/projects").with_header("cookie", "session=tok");
        assert!(decide(&guard, &req).await.is_pass_through());
    }

    #[tokio::test]
    async fn pages_redirect_to_login_with_return_path() {
        let guard = RequireSession::new("session");
        let req = Request::new(Method::Get, "/projects/3?tab=board");
        assert_eq!(
            decide(&guard, &req).await,
            MiddlewareResponse::redirect("/login?next=%2Fprojects%2F3%3Ftab%3Dboard")
        );
    }

    #[tokio::test]
    async fn return_path_is_form_encoded() {
        let guard = RequireSession::new("session");
        let req = Request::new(Method::Get, "/projects/tâche?q=a b&x=1");
        assert_eq!(
            decide(&guard, &req).await,
            MiddlewareResponse::redirect("/login?next=%2Fprojects%2Ft%C3%A2che%3Fq%3Da+b%26x%3D1")
        );
    }

    #[tokio::test]
    async fn custom_login_path_replaces_the_default() {
        let guard = RequireSession::new("session").login_path("/signin");

        let old = Request::new(Method::Get, "/login");
        assert_eq!(
            decide(&guard, &old).await,
            MiddlewareResponse::redirect("/signin?next=%2Flogin")
        );

        let new = Request::new(Method::Get, "/signin");
        assert!(decide(&guard, &new).await.is_pass_through());
    }

    #[tokio::test]
    async fn api_requests_get_401() {
        let guard = RequireSession::new("session").allow("/api/public");
        let req = Request::new(Method::Get, "/api/tasks").with_header("cookie", "session=");
        match decide(&guard, &req).await {
            MiddlewareResponse::Respond(res) => {
                assert_eq!(res.status_code(), 401);
                assert_eq!(res.body(), br#"{"error":"unauthorized"}"#);
            }
            other => panic!("unexpected {other:?}"),
        }

        let open = Request::new(Method::Get, "/api/public/ping");
        assert!(decide(&guard, &open).await.is_pass_through());
    }
}
