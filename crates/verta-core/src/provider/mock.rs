//! Scripted Mock Provider
//!
//! For testing and demo purposes. Replays a fixed script of stream events
//! so engine behavior can be exercised without a live backend.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use super::{
    CompletionStream, GenerationOptions, LlmProvider, ModelInfo, PromptMessage, ProviderInfo,
    StreamChunk,
};
use crate::error::{PlatformError, Result};

/// One scripted stream event
#[derive(Clone, Debug)]
pub enum ScriptStep {
    /// Deliver a text chunk
    Delta(String),

    /// Fail mid-stream with the given message
    Fail(String),
}

/// Mock provider that replays a scripted stream
pub struct ScriptedProvider {
    script: Vec<ScriptStep>,

    /// Fail the request before any chunk is produced
    fail_on_start: Option<String>,

    /// Delay before each scripted event (for timeout testing)
    step_delay: Option<Duration>,

    /// Request payloads seen, newest last
    requests: Mutex<Vec<Vec<PromptMessage>>>,
}

impl ScriptedProvider {
    /// Deliver the given chunks in order, then complete
    pub fn with_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: chunks
                .into_iter()
                .map(|c| ScriptStep::Delta(c.into()))
                .collect(),
            fail_on_start: None,
            step_delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replay an explicit script of deltas and failures
    pub fn with_script(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            fail_on_start: None,
            step_delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reject the request before any chunk is delivered
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Vec::new(),
            fail_on_start: Some(message.into()),
            step_delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Delay each scripted event by `delay`
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = Some(delay);
        self
    }

    /// Request payloads received so far
    pub fn requests(&self) -> Vec<Vec<PromptMessage>> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Scripted".into(),
            version: None,
            models: self.list_models().await?,
            supports_streaming: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete_stream(
        &self,
        messages: &[PromptMessage],
        _options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(messages.to_vec());

        if let Some(message) = &self.fail_on_start {
            return Err(PlatformError::Provider(message.clone()));
        }

        let items: Vec<Result<StreamChunk>> = self
            .script
            .iter()
            .map(|step| match step {
                ScriptStep::Delta(text) => Ok(StreamChunk::delta(text.clone())),
                ScriptStep::Fail(message) => Err(PlatformError::Provider(message.clone())),
            })
            .collect();

        let delay = self.step_delay;
        let stream = futures::stream::iter(items).then(move |item| async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            item
        });

        Ok(Box::pin(stream))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "scripted".into(),
            name: "scripted".into(),
            context_length: None,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_script_in_order() {
        let provider = ScriptedProvider::with_chunks(["a", "b", "c"]);
        let mut stream = provider
            .complete_stream(&[PromptMessage::user("hi")], &GenerationOptions::default())
            .await
            .unwrap();

        let mut seen = String::new();
        while let Some(chunk) = stream.next().await {
            seen.push_str(&chunk.unwrap().delta);
        }
        assert_eq!(seen, "abc");
    }

    #[tokio::test]
    async fn test_records_request_payload() {
        let provider = ScriptedProvider::with_chunks(["ok"]);
        provider
            .complete_stream(
                &[PromptMessage::system("prompt"), PromptMessage::user("hi")],
                &GenerationOptions::default(),
            )
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].len(), 2);
        assert_eq!(requests[0][1].content, "hi");
    }
}
