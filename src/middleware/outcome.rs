use crate::response::Response;
use crate::status::Status;

/// What a middleware decided for the request.
///
/// `Next` is the default pass-through: the request continues to the router.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MiddlewareResponse {
    /// Continue to the router; `headers` are appended to its response.
    Next { headers: Vec<(String, String)> },
    /// Continue to the router as if `path` had been requested.
    Rewrite { path: String, headers: Vec<(String, String)> },
    /// Answer with a redirect; the router is not consulted.
    Redirect { location: String, status: Status, headers: Vec<(String, String)> },
    /// Answer with this response; the router is not consulted.
    Respond(Response),
}

impl MiddlewareResponse {
    /// The default pass-through response.
    pub fn next() -> Self {
        Self::Next { headers: Vec::new() }
    }

    pub fn rewrite(path: impl Into<String>) -> Self {
        Self::Rewrite { path: path.into(), headers: Vec::new() }
    }

    /// `307 Temporary Redirect` to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::redirect_with(location, Status::TemporaryRedirect)
    }

    pub fn redirect_with(location: impl Into<String>, status: Status) -> Self {
        Self::Redirect { location: location.into(), status, headers: Vec::new() }
    }

    pub fn respond(response: Response) -> Self {
        Self::Respond(response)
    }

    /// Adds a header to whatever response this outcome ends up producing.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let header = (name.to_owned(), value.to_owned());
        match &mut self {
            Self::Next { headers }
            | Self::Rewrite { headers, .. }
            | Self::Redirect { headers, .. } => headers.push(header),
            Self::Respond(res) => res.headers.push(header),
        }
        self
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::Next { .. })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Next { .. }     => "next",
            Self::Rewrite { .. }  => "rewrite",
            Self::Redirect { .. } => "redirect",
            Self::Respond(_)      => "respond",
        }
    }
}

impl Default for MiddlewareResponse {
    fn default() -> Self {
        Self::next()
    }
}
