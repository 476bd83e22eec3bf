//! Generation client
//!
//! Thin wrapper over an [`Oracle`] offering both failure policies:
//! [`GenerationClient::generate`] absorbs failures into an empty reply,
//! [`GenerationClient::try_generate`] reports them.

use crate::error::GenerationError;
use crate::oracle::Oracle;

/// Sends composed prompts to an oracle
#[derive(Debug, Clone)]
pub struct GenerationClient<O> {
    oracle: O,
}

impl<O: Oracle> GenerationClient<O> {
    /// Create client over an oracle
    #[inline]
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Get underlying oracle
    #[inline]
    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Generate a raw reply, reporting failures
    ///
    /// # Errors
    /// Returns whatever the oracle failed with
    pub async fn try_generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let reply = self.oracle.complete(prompt).await?;
        tracing::debug!("Oracle replied with {} bytes", reply.len());
        Ok(reply)
    }

    /// Generate a raw reply, returning an empty string on failure
    ///
    /// The failure is logged; an empty result cannot be told apart from an
    /// empty reply. Use [`GenerationClient::try_generate`] when that matters.
    pub async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Error generating test case: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockOracle;

    #[tokio::test]
    async fn generate_returns_raw_reply() {
        let mut oracle = MockOracle::new();
        oracle
            .expect_complete()
            .withf(|prompt| prompt.contains("write tests"))
            .times(1)
            .returning(|_| Ok("```python\nassert True\n```".to_string()));

        let client = GenerationClient::new(oracle);
        assert_eq!(
            client.generate("write tests").await,
            "```python\nassert True\n```"
        );
    }

    #[tokio::test]
    async fn generate_absorbs_failure() {
        let mut oracle = MockOracle::new();
        oracle
            .expect_complete()
            .times(1)
            .returning(|_| Err(GenerationError::Oracle("model not found".to_string())));

        let client = GenerationClient::new(oracle);
        assert_eq!(client.generate("write tests").await, "");
    }

    #[tokio::test]
    async fn try_generate_reports_failure() {
        let mut oracle = MockOracle::new();
        oracle.expect_complete().times(1).returning(|_| {
            Err(GenerationError::Status {
                status: 503,
                body: "loading".to_string(),
            })
        });

        let client = GenerationClient::new(oracle);
        let err = client.try_generate("write tests").await.unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn empty_reply_is_ok() {
        let mut oracle = MockOracle::new();
        oracle
            .expect_complete()
            .times(1)
            .returning(|_| Ok(String::new()));

        let client = GenerationClient::new(oracle);
        assert_eq!(client.try_generate("p").await.unwrap(), "");
    }
}
