//! Minimal taskdeck service: session-gated task endpoints behind the
//! middleware chain, probes, and the flag endpoint.
//!
//! Run with:
//!   cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/projects                       # 307 → /login
//!   curl -i http://localhost:3000/api/tasks/42                   # 401
//!   curl -i -H 'cookie: session=dev' http://localhost:3000/api/tasks/42
//!   curl -i -H 'cookie: session=dev' http://localhost:3000/tasks/42   # rewritten
//!   curl http://localhost:3000/api/flags?env=production
//!   FEATURE_AI_TASK_DRAFTS=off cargo run --example basic

use taskdeck::flags::{FeatureFlags, Flag};
use taskdeck::middleware::{self, Chain, MiddlewareResponse, Next, RequestEvent};
use taskdeck::{BoxFuture, Config, Method, Request, Response, Router, Server, Status, health};

#[tokio::main]
async fn main() -> Result<(), taskdeck::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_process_env()?;
    let flags = FeatureFlags::from_process_env();

    // Registered last = innermost = runs first.
    let chain = Chain::new()
        .with(middleware::Trace)
        .with(middleware::RequireSession::new("session"))
        .named("legacy_task_paths", middleware::from_fn(legacy_task_paths));

    let mut app = Router::new()
        .on(Method::Get,    "/api/tasks/{id}", get_task)
        .on(Method::Patch,  "/api/tasks/{id}", update_task)
        .on(Method::Get,    "/healthz",        health::liveness)
        .on(Method::Get,    "/readyz",         health::readiness)
        .on(Method::Get,    "/api/flags",      health::flags(flags.clone()));

    if flags.is_enabled(Flag::AiTaskDrafts, None) {
        app = app.on(Method::Post, "/api/projects/{id}/drafts", create_drafts);
    }

    Server::from_addr(config.addr).serve(app.middleware(chain)).await
}

// `/tasks/{id}` was the pre-API URL scheme.
fn legacy_task_paths<'a>(
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

async fn get_task(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","title":"Write release notes"}}"#).into_bytes())
}

async fn update_task(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(Status::BadRequest);
    }
    Response::status(Status::NoContent)
}

async fn create_drafts(_req: Request) -> Response {
    Response::builder()
        .status(Status::Accepted)
        .json(br#"{"status":"generating"}"#.to_vec())
}
