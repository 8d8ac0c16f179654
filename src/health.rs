//! Built-in probe and diagnostics handlers.
//!
//! | Path | Handler | Answers |
//! |---|---|---|
//! | `/healthz` | [`liveness`] | Is the process alive? |
//! | `/readyz` | [`readiness`] | Can it take traffic? |
//! | `/api/flags` | [`flags`] | Which features are on here? |
//!
//! ```rust
//! use taskdeck::{Method, Router, health};
//! use taskdeck::flags::FeatureFlags;
//!
//! let app = Router::new()
//!     .on(Method::Get, "/healthz", health::liveness)
//!     .on(Method::Get, "/readyz", health::readiness)
//!     .on(Method::Get, "/api/flags", health::flags(FeatureFlags::from_process_env()));
//! ```

use std::future::{Ready, ready};
use std::sync::Arc;

use url::form_urlencoded;

use crate::flags::{Environment, FeatureFlags};
use crate::{Request, Response, Status};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"`. Replace it when readiness depends on the
/// database or other collaborators.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

/// A handler serving the resolved flag map as JSON.
///
/// `?env=production` resolves for another environment instead of the
/// running one; an unknown value falls back to the running one.
pub fn flags(flags: FeatureFlags) -> impl Fn(Request) -> Ready<Response> + Send + Sync + 'static {
    let flags = Arc::new(flags);
    move |req: Request| {
        let requested = req.query()
            .and_then(|q| form_urlencoded::parse(q.as_bytes()).find(|(k, _)| k == "env"))
            .and_then(|(_, v)| v.parse::<Environment>().ok());
        let environment = requested.unwrap_or(flags.environment());
        let body = serde_json::json!({
            "environment": environment,
            "flags": flags.resolve_all(Some(environment)),
        });
        ready(match serde_json::to_vec(&body) {
            Ok(bytes) => Response::json(bytes),
            Err(_) => Response::status(Status::InternalServerError),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::EnvSnapshot;
    use crate::method::Method;

    #[tokio::test]
    async fn flags_endpoint_resolves_requested_environment() {
        let handler = flags(FeatureFlags::new(EnvSnapshot::from_pairs([("APP_ENV", "development")])));

        let res = handler(Request::new(Method::Get, "/api/flags?env=production")).await;
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["environment"], "production");
        assert_eq!(json["flags"]["taskInlineEdit"], false);

        let res = handler(Request::new(Method::Get, "/api/flags")).await;
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["environment"], "development");
        assert_eq!(json["flags"]["taskInlineEdit"], true);
    }

    #[tokio::test]
    async fn env_parameter_is_percent_decoded() {
        let handler = flags(FeatureFlags::new(EnvSnapshot::default()));

        let res = handler(Request::new(Method::Get, "/api/flags?verbose=1&env=%20Prod%20")).await;
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["environment"], "production");

        let res = handler(Request::new(Method::Get, "/api/flags?env=nowhere")).await;
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["environment"], "development");
    }
}
