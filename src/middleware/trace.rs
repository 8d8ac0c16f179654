use tracing::info;

use super::{Malformed, Middleware, MiddlewareResponse, Next, RequestEvent};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Logs one line per request with the outcome the inner middleware resolved.
///
/// Register it first: the outermost handler runs last, so it sees the final
/// decision of everything registered after it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        next: Next,
        event: &'a RequestEvent,
    ) -> BoxFuture<'a, Result<MiddlewareResponse, Malformed>> {
        Box::pin(async move {
            let outcome = next.run();
            info!(
                request_id = event.request_id(),
                method = %req.method(),
                path = req.path(),
                outcome = outcome.kind(),
                "request",
            );
            Ok(outcome)
        })
    }

    fn name(&self) -> &str {
        "trace"
    }
}
