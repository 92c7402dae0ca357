//! LLM interaction: send one [`Prompt`] and return the model's text.
//!
//! [`TextGenerator`] is the seam between the pipeline and the network. The
//! production implementation, [`ProviderGenerator`], wraps an
//! `edgequake_llm` provider with a per-attempt timeout and exponential
//! backoff; tests plug in deterministic fakes.
//!
//! ## Retry Strategy
//!
//! 429 / 5xx responses and timeouts are usually transient under concurrent
//! load. The delay before retry `n` is `retry_backoff_ms * 2^(n-1)`, so with
//! the defaults (500 ms, 2 retries) a failing chunk waits 500 ms then 1 s
//! before it resolves to its placeholder.

use crate::config::StudyConfig;
use crate::error::LlmCallError;
use crate::prompts::Prompt;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Anything that can answer a chat prompt with text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &Prompt) -> impl Future<Output = Result<String, LlmCallError>> + Send;
}

impl<G: TextGenerator> TextGenerator for &G {
    fn generate(&self, prompt: &Prompt) -> impl Future<Output = Result<String, LlmCallError>> + Send {
        (**self).generate(prompt)
    }
}

impl<G: TextGenerator> TextGenerator for Arc<G> {
    fn generate(&self, prompt: &Prompt) -> impl Future<Output = Result<String, LlmCallError>> + Send {
        (**self).generate(prompt)
    }
}

/// A [`TextGenerator`] backed by an `edgequake_llm` provider.
///
/// Built once per process from [`StudyConfig`] and shared by every call.
pub struct ProviderGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
    max_retries: u32,
    retry_backoff_ms: u64,
    api_timeout_secs: u64,
}

impl ProviderGenerator {
    /// Chunk transforms: `temperature` and `max_tokens` from `config`.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &StudyConfig) -> Self {
        Self::with_options(provider, config, build_options(config))
    }

    /// Whole-document rewrites such as the CV: no output cap and the
    /// provider's own temperature, so a long reply is never cut off mid-tag.
    pub fn uncapped(provider: Arc<dyn LLMProvider>, config: &StudyConfig) -> Self {
        Self::with_options(provider, config, CompletionOptions::default())
    }

    fn with_options(
        provider: Arc<dyn LLMProvider>,
        config: &StudyConfig,
        options: CompletionOptions,
    ) -> Self {
        Self {
            provider,
            options,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
            api_timeout_secs: config.api_timeout_secs,
        }
    }
}

impl TextGenerator for ProviderGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmCallError> {
        let messages = vec![
            ChatMessage::system(&prompt.system),
            ChatMessage::user(&prompt.user),
        ];
        let start = Instant::now();
        let limit = Duration::from_secs(self.api_timeout_secs);
        let mut last_err = LlmCallError::Failed {
            attempts: 0,
            detail: "no attempt made".into(),
        };

        for attempt in 0..=self.max_retries {
            let attempts = attempt + 1;
            if attempt > 0 {
                let backoff = backoff_ms(self.retry_backoff_ms, attempt);
                warn!("retry {}/{} after {}ms: {}", attempt, self.max_retries, backoff, last_err);
                sleep(Duration::from_millis(backoff)).await;
            }

            match timeout(limit, self.provider.chat(&messages, Some(&self.options))).await {
                Ok(Ok(response)) if !response.content.trim().is_empty() => {
                    debug!(
                        "{} input tokens, {} output tokens, {:?}",
                        response.prompt_tokens,
                        response.completion_tokens,
                        start.elapsed()
                    );
                    return Ok(response.content);
                }
                Ok(Ok(_)) => last_err = LlmCallError::EmptyResponse { attempts },
                Ok(Err(e)) => {
                    last_err = LlmCallError::Failed {
                        attempts,
                        detail: e.to_string(),
                    }
                }
                Err(_) => {
                    last_err = LlmCallError::Timeout {
                        attempts,
                        secs: self.api_timeout_secs,
                    }
                }
            }
        }

        Err(last_err)
    }
}

/// `CompletionOptions` for chunk transforms.
fn build_options(config: &StudyConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Delay before retry number `attempt` (1-based).
fn backoff_ms(base: u64, attempt: u32) -> u64 {
    base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}
