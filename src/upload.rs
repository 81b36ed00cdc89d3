//! Fire-and-forget upload of the full-resolution composite for a hosted URL.
//!
//! The session never waits on an upload. Transports receive an [`UploadReply`] and complete it
//! whenever the round trip finishes; the session drains completions on its next `poll`.

use std::sync::mpsc;

use crate::foundation::error::{FrameError, FrameResult};

/// One full-resolution composite to push to the configured endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub endpoint: String,
    pub token: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    /// Monotonic per session; identifies which save produced the image.
    pub generation: u64,
}

/// Endpoint reply body: `{"success": bool, "url"?: string}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl UploadResponse {
    pub fn from_json(body: &str) -> FrameResult<Self> {
        serde_json::from_str(body).map_err(|e| FrameError::upload(format!("bad response: {e}")))
    }

    /// The hosted URL, or an error when the endpoint reported failure or sent no URL.
    pub fn hosted_url(self) -> FrameResult<String> {
        if !self.success {
            return Err(FrameError::upload("endpoint reported failure"));
        }
        self.url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| FrameError::upload("endpoint returned no url"))
    }
}

#[derive(Debug)]
pub struct UploadCompletion {
    pub generation: u64,
    pub result: FrameResult<UploadResponse>,
}

/// Completion handle handed to the transport along with each request.
#[derive(Debug)]
pub struct UploadReply {
    generation: u64,
    tx: mpsc::Sender<UploadCompletion>,
}

impl UploadReply {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn complete(self, result: FrameResult<UploadResponse>) {
        let generation = self.generation;
        if self.tx.send(UploadCompletion { generation, result }).is_err() {
            tracing::debug!(generation, "upload finished after its session was dropped");
        }
    }

    /// Complete from a raw response body.
    pub fn complete_json(self, body: &str) {
        let result = UploadResponse::from_json(body);
        self.complete(result);
    }
}

/// Transport for the upload side channel.
///
/// `submit` must return promptly; the transport owns the request from here on and reports
/// back through `reply` from any thread.
pub trait Uploader: Send {
    fn submit(&self, request: UploadRequest, reply: UploadReply);
}

pub(crate) struct UploadChannel {
    tx: mpsc::Sender<UploadCompletion>,
    rx: mpsc::Receiver<UploadCompletion>,
    next_generation: u64,
}

impl UploadChannel {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            next_generation: 1,
        }
    }

    pub(crate) fn reply(&mut self) -> UploadReply {
        let generation = self.next_generation;
        self.next_generation += 1;
        UploadReply {
            generation,
            tx: self.tx.clone(),
        }
    }

    /// Generation the next reply will carry.
    pub(crate) fn peek_generation(&self) -> u64 {
        self.next_generation
    }

    pub(crate) fn drain(&self) -> Vec<UploadCompletion> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
#[path = "../tests/unit/upload.rs"]
mod tests;
