//! Mock Machine Translator for testing
//!
//! A deterministic, API-free translator for exercising the document pipeline
//! without API keys or network access. It also backs the `--mock` flag of the
//! CLI and `LOCALE_TREE_MOCK` of the web server.
//!
//! # Example
//!
//! ```ignore
//! use locale_tree::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "en", "fr").await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_fr"
    /// Anchor tokens pass through untouched
    Suffix,

    /// Replace substrings in order, leaving everything else as is
    /// Useful for translating prose around `{{token}}` anchors
    Replace(Vec<(String, String)>),

    /// Fail with a `TranslationError` when the text contains this substring,
    /// otherwise behave like `Suffix`
    FailOn(String),

    /// Every call fails with a `TranslationError`
    Error(String),

    /// Every call returns an empty string
    Empty,

    /// The readiness check fails with a `ConfigError`
    Unavailable(String),
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new MockTranslator with the given mode
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay_ms: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a MockTranslator with simulated network delay
    ///
    /// ```ignore
    /// let mock = MockTranslator::with_delay(MockMode::Suffix, 50);
    /// // Each translation will have ~50ms delay
    /// ```
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new(mode)
        }
    }

    /// Number of `translate` calls made so far, shared between clones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix | MockMode::Unavailable(_) => Ok(format!("{}_{}", text, target)),
            MockMode::Replace(pairs) => Ok(pairs
                .iter()
                .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))),
            MockMode::FailOn(needle) if text.contains(needle.as_str()) => Err(
                MtError::TranslationError(format!("Mock failure for '{}'", needle)),
            ),
            MockMode::FailOn(_) => Ok(format!("{}_{}", text, target)),
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::Empty => Ok(String::new()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    async fn check_ready(&self) -> MtResult<()> {
        match &self.mode {
            MockMode::Unavailable(msg) => Err(MtError::ConfigError(msg.clone())),
            _ => Ok(()),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
