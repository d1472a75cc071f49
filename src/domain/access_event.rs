//! Access event model for asynchronous analytics recording.

/// A single short-link access, queued for the background analytics worker.
///
/// Created in the redirect handler and handed off over a bounded channel so
/// the redirect response never waits on the store. If the queue is full the
/// event is dropped; analytics are best-effort.
#[derive(Debug, Clone)]
pub struct AccessEvent {
    /// The short identifier that was resolved.
    pub identifier: String,
    /// The client key (IP address) that accessed it.
    pub client_key: String,
}

impl AccessEvent {
    pub fn new(identifier: impl Into<String>, client_key: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            client_key: client_key.into(),
        }
    }
}
