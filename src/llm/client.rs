//! LlmClient trait definition

use async_trait::async_trait;

use super::LlmError;

/// Stateless prompt transport - each call is independent
///
/// This is the seam between the classifier and the provider wire protocols:
/// send one prompt, receive the raw reply text. Retry, backoff, and reply
/// parsing live above this trait; adapters only speak their provider's
/// protocol and map transport failures into [`LlmError`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single prompt and return the provider's reply text
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::debug;

    /// Scripted reply or failure for one mock attempt
    pub enum MockReply {
        Text(String),
        Timeout,
        Connection,
        Api(u16),
    }

    /// Mock transport for unit tests
    ///
    /// Returns scripted replies in order; once exhausted, repeats the last
    /// entry. An empty script behaves as a permanently unreachable endpoint.
    pub struct MockLlmClient {
        replies: Mutex<Vec<MockReply>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(replies: Vec<MockReply>) -> Self {
            debug!(reply_count = %replies.len(), "MockLlmClient::new: called");
            Self {
                replies: Mutex::new(replies),
                call_count: AtomicUsize::new(0),
            }
        }

        /// A transport where every attempt times out
        pub fn unreachable() -> Self {
            Self::new(vec![])
        }

        /// A transport that always returns the given text
        pub fn with_text(text: impl Into<String>) -> Self {
            Self::new(vec![MockReply::Text(text.into())])
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: called");
            let replies = self.replies.lock().unwrap();
            let reply = if replies.is_empty() {
                None
            } else {
                Some(replies.get(idx).unwrap_or_else(|| replies.last().unwrap()))
            };
            match reply {
                Some(MockReply::Text(text)) => Ok(text.clone()),
                Some(MockReply::Timeout) | None => Err(LlmError::Timeout(Duration::from_secs(30))),
                Some(MockReply::Connection) => Err(LlmError::ApiError {
                    status: 503,
                    message: "connection refused".to_string(),
                }),
                Some(MockReply::Api(status)) => Err(LlmError::ApiError {
                    status: *status,
                    message: "mock api error".to_string(),
                }),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_scripted_replies() {
            let client = MockLlmClient::new(vec![
                MockReply::Text("NEXT: moving on".to_string()),
                MockReply::Timeout,
            ]);

            let first = client.complete("prompt").await;
            assert_eq!(first.unwrap(), "NEXT: moving on");

            let second = client.complete("prompt").await;
            assert!(matches!(second, Err(LlmError::Timeout(_))));

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_unreachable_mock_always_times_out() {
            let client = MockLlmClient::unreachable();
            for _ in 0..3 {
                assert!(matches!(
                    client.complete("prompt").await,
                    Err(LlmError::Timeout(_))
                ));
            }
            assert_eq!(client.call_count(), 3);
        }
    }
}
