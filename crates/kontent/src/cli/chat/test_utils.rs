//! Test helpers for the chat REPL.
use async_trait::async_trait;
use kontent_core::credential::Credential;
use kontent_core::dispatch::{Generator, SubmitError, SubmitRequest};
use std::sync::Mutex;

/// Generator that records requests and replies with a fixed result.
pub struct MockGenerator {
    requests: Mutex<Vec<SubmitRequest>>,
    reply: Result<String, SubmitError>,
}

impl MockGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            requests: Mutex::new(vec![]),
            reply: Ok(text.to_string()),
        }
    }

    pub fn failing(error: SubmitError) -> Self {
        Self {
            requests: Mutex::new(vec![]),
            reply: Err(error),
        }
    }

    pub fn requests(&self) -> Vec<SubmitRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        request: &SubmitRequest,
        _credential: &Credential,
    ) -> Result<String, SubmitError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}
