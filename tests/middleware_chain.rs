use std::sync::{Arc, Mutex};

use taskdeck::middleware::{
    self, BoxedMiddleware, Chain, Malformed, Middleware, MiddlewareResponse, Next, RequestEvent,
};
use taskdeck::{BoxFuture, Method, Request, Response, Router, Status};

type Log = Arc<Mutex<Vec<String>>>;

/// Records its name, then passes the inner result through.
struct Observe {
    name: &'static str,
    log: Log,
}

impl Middleware for Observe {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        next: Next,
        _event: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, Malformed>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, next.peek().kind()));
            req.set_header("x-seen-by", self.name);
            Ok(next.run())
        })
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Records its name and answers with a terminal response.
struct Answer {
    log: Log,
}

impl Middleware for Answer {
    fn call<'a>(
        &'a self,
        _req: &'a mut Request,
        _next: Next,
        _event: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, Malformed>> {
        Box::pin(async move {
            self.log.lock().unwrap().push("answer".to_owned());
            Ok(MiddlewareResponse::respond(Response::text("from B")))
        })
    }
}

fn forgets_to_return<'a>(
    _req: &'a mut Request,
    _next: Next,
    _ev: &'a RequestEvent,
) -> BoxFuture<'a, ()> {
    Box::pin(async {})
}

fn fails<'a>(
    _req: &'a mut Request,
    _next: Next,
    _ev: &'a RequestEvent,
) -> BoxFuture<'a, Result<MiddlewareResponse, String>> {
    Box::pin(async { Err("session store unreachable".to_owned()) })
}

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn request() -> Request {
    Request::new(Method::Get, "/api/tasks")
}

#[tokio::test]
async fn outer_handler_observes_inner_terminal_response() {
    let log = log();
    let chain = Chain::new()
        .with(Observe { name: "A", log: log.clone() })
        .with(Answer { log: log.clone() });

    for _ in 0..2 {
        let out = chain.run(&mut request(), &RequestEvent::default()).await;
        assert_eq!(out, MiddlewareResponse::respond(Response::text("from B")));
    }

    // Inner first, then outer, exactly once per invocation.
    assert_eq!(*log.lock().unwrap(), ["answer", "A:respond", "answer", "A:respond"]);
}

#[tokio::test]
async fn handlers_run_innermost_first() {
    let log = log();
    let chain = Chain::new()
        .with(Observe { name: "h1", log: log.clone() })
        .with(Observe { name: "h2", log: log.clone() })
        .with(Observe { name: "h3", log: log.clone() });

    let mut req = request();
    let out = chain.run(&mut req, &RequestEvent::default()).await;

    assert!(out.is_pass_through());
    assert_eq!(*log.lock().unwrap(), ["h3:next", "h2:next", "h1:next"]);
    // The outermost handler wrote last.
    assert_eq!(req.header("x-seen-by"), Some("h1"));
}

#[tokio::test]
async fn empty_chain_returns_pass_through() {
    let out = Chain::new().run(&mut request(), &RequestEvent::default()).await;
    assert_eq!(out, MiddlewareResponse::next());
}

#[tokio::test]
async fn missing_entries_do_not_change_behaviour() {
    let filtered_log = log();
    let filtered = Chain::from_entries([
        Some(Arc::new(Observe { name: "A", log: filtered_log.clone() }) as BoxedMiddleware),
        None,
        Some(Arc::new(Answer { log: filtered_log.clone() }) as BoxedMiddleware),
    ]);

    let plain_log = log();
    let plain = Chain::new()
        .with(Observe { name: "A", log: plain_log.clone() })
        .with(Answer { log: plain_log.clone() });

    assert_eq!(filtered.len(), plain.len());
    assert_eq!(filtered.names().collect::<Vec<_>>(), plain.names().collect::<Vec<_>>());

    let a = filtered.run(&mut request(), &RequestEvent::default()).await;
    let b = plain.run(&mut request(), &RequestEvent::default()).await;
    assert_eq!(a, b);
    assert_eq!(*filtered_log.lock().unwrap(), *plain_log.lock().unwrap());
}

#[tokio::test]
async fn malformed_returns_become_pass_through() {
    let log = log();
    let chain = Chain::new()
        .with(Observe { name: "outer", log: log.clone() })
        .with(middleware::from_fn(forgets_to_return))
        .with(Answer { log: log.clone() });

    let out = chain.run(&mut request(), &RequestEvent::default()).await;

    // The terminal response from `Answer` is lost: the malformed handler
    // in between was replaced by the default pass-through.
    assert!(out.is_pass_through());
    assert_eq!(*log.lock().unwrap(), ["answer", "outer:next"]);
}

#[tokio::test]
async fn handler_errors_are_not_propagated() {
    let chain = Chain::new().named("session", middleware::from_fn(fails));
    let out = chain.run(&mut request(), &RequestEvent::default()).await;
    assert!(out.is_pass_through());
}

#[tokio::test]
async fn nested_chain_continues_from_outer_next() {
    let log = log();
    let inner = Chain::new().with(Observe { name: "inner", log: log.clone() });
    let outer = Chain::new()
        .with(inner)
        .with(Answer { log: log.clone() });

    let out = outer.run(&mut request(), &RequestEvent::default()).await;
    assert_eq!(out, MiddlewareResponse::respond(Response::text("from B")));
    assert_eq!(*log.lock().unwrap(), ["answer", "inner:respond"]);
}

#[tokio::test]
async fn closures_can_capture_state() {
    let hits = Arc::new(Mutex::new(0u32));
    let counter = hits.clone();
    let chain = Chain::new().with(middleware::from_fn(move |_req, next, _ev| {
        let counter = counter.clone();
        Box::pin(async move {
            *counter.lock().unwrap() += 1;
            next.run().with_header("x-request-count", "1")
        })
    }));

    let out = chain.run(&mut request(), &RequestEvent::default()).await;
    assert_eq!(*hits.lock().unwrap(), 1);
    assert_eq!(
        out,
        MiddlewareResponse::Next { headers: vec![("x-request-count".to_owned(), "1".to_owned())] }
    );
}

#[tokio::test]
async fn router_applies_chain_outcomes() {
    async fn list_tasks(_req: Request) -> Response {
        Response::json(b"[]".to_vec())
    }

    fn stamp<'a>(
        _req: &'a mut Request,
        next: Next,
        _ev: &'a RequestEvent,
    ) -> BoxFuture<'a, MiddlewareResponse> {
        Box::pin(async move { next.run().with_header("x-workspace", "acme") })
    }

    fn block_deletes<'a>(
        req: &'a mut Request,
        next: Next,
        _ev: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, String>> {
        Box::pin(async move {
            if req.method() == Method::Delete {
                return Ok(MiddlewareResponse::respond(Response::status(Status::Forbidden)));
            }
            Ok(next.run())
        })
    }

    let app = Router::new()
        .on(Method::Get, "/api/tasks", list_tasks)
        .middleware(
            Chain::new()
                .with(middleware::from_fn(stamp))
                .with(middleware::from_fn(block_deletes)),
        );

    let ok = app.handle(request(), &RequestEvent::default()).await;
    assert_eq!(ok.status_code(), 200);
    assert_eq!(ok.header("x-workspace"), Some("acme"));

    let denied = app.handle(Request::new(Method::Delete, "/api/tasks"), &RequestEvent::default()).await;
    assert_eq!(denied.status_code(), 403);
    assert_eq!(denied.header("x-workspace"), Some("acme"));
}
