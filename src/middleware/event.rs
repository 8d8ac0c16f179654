use std::net::SocketAddr;
use std::time::Instant;

/// Per-request context threaded unchanged to every middleware.
#[derive(Clone, Debug)]
pub struct RequestEvent {
    request_id: u64,
    remote_addr: Option<SocketAddr>,
    received_at: Instant,
}

impl RequestEvent {
    pub fn new(request_id: u64, remote_addr: Option<SocketAddr>) -> Self {
        Self { request_id, remote_addr, received_at: Instant::now() }
    }

    pub fn request_id(&self) -> u64 { self.request_id }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }
    pub fn received_at(&self) -> Instant { self.received_at }
}

impl Default for RequestEvent {
    fn default() -> Self {
        Self::new(0, None)
    }
}
