//! Document-level translation
//!
//! `TreeTranslator` finds every translatable `"translated"` string in a
//! `Document`, protects its markup, sends it to a `MachineTranslator`, and
//! writes the restored result back in place.
//!
//! # Example
//!
//! ```ignore
//! use locale_tree::{MockMode, MockTranslator, TranslateOptions, TreeTranslator};
//! use std::sync::Arc;
//!
//! let translator = TreeTranslator::new(Arc::new(MockTranslator::new(MockMode::Suffix)))
//!     .with_options(TranslateOptions::default().with_concurrency(4));
//! let result = translator
//!     .translate_json(r#"{"greeting": {"original": "Hi", "translated": "Hi"}}"#, "es")
//!     .await?;
//! assert!(result.failures.is_empty());
//! ```
//!
//! A leaf whose translation fails keeps its input text and is reported in
//! `TranslatedDocument::failures`; the rest of the document is unaffected.
//! Only request-level problems (bad input, bad locale, provider not ready)
//! make `translate` return `Err`.

use crate::document::Document;
use crate::error::{MtError, MtResult};
use crate::markup::{self, Encoded};
use crate::translator::{MachineTranslator, validate_locale};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Knobs for a `TreeTranslator`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Language all `"translated"` texts are assumed to be in
    pub source_locale: String,
    /// Maximum number of provider calls in flight at once
    pub concurrency: usize,
    /// Treat lost or duplicated placeholder anchors as a leaf failure
    pub strict_placeholders: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            source_locale: "en".to_string(),
            concurrency: 8,
            strict_placeholders: false,
        }
    }
}

impl TranslateOptions {
    pub fn with_source_locale(mut self, locale: &str) -> Self {
        self.source_locale = locale.to_string();
        self
    }

    /// Values below 1 are treated as 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_strict_placeholders(mut self, strict: bool) -> Self {
        self.strict_placeholders = strict;
        self
    }
}

/// A leaf that kept its input text because translation failed
#[derive(Debug, Clone, PartialEq)]
pub struct LeafFailure {
    /// Dotted JSON path of the `"translated"` value
    pub path: String,
    pub error: MtError,
}

/// Result of translating one document
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedDocument {
    pub document: Document,
    /// Number of leaves replaced with a translation
    pub translated: usize,
    /// Leaves left untouched, in document order
    pub failures: Vec<LeafFailure>,
}

/// Translates localization documents through a `MachineTranslator`
#[derive(Clone)]
pub struct TreeTranslator {
    provider: Arc<dyn MachineTranslator>,
    options: TranslateOptions,
}

impl TreeTranslator {
    pub fn new(provider: Arc<dyn MachineTranslator>) -> Self {
        TreeTranslator {
            provider,
            options: TranslateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Parse JSON text and translate it
    pub async fn translate_json(
        &self,
        input: &str,
        target_locale: &str,
    ) -> MtResult<TranslatedDocument> {
        let document = Document::parse(input)?;
        self.translate(document, target_locale).await
    }

    /// Translate an already parsed JSON value; the root must be an object
    pub async fn translate_value(
        &self,
        value: serde_json::Value,
        target_locale: &str,
    ) -> MtResult<TranslatedDocument> {
        let document = Document::from_root(value)?;
        self.translate(document, target_locale).await
    }

    /// Translate every `"translated"` string of `document` into `target_locale`
    pub async fn translate(
        &self,
        mut document: Document,
        target_locale: &str,
    ) -> MtResult<TranslatedDocument> {
        validate_locale(&self.options.source_locale)?;
        validate_locale(target_locale)?;
        self.provider.check_ready().await?;

        let started = Instant::now();
        debug!(leaves = document.leaf_count(), target = target_locale, "Collecting leaves");
        let mut leaves = document.text_leaves_mut();

        let mut pending = Vec::new();
        for (index, leaf) in leaves.iter().enumerate() {
            let encoded = markup::encode(leaf.text.as_str());
            if encoded.text.is_empty() {
                continue;
            }
            debug!(
                path = %leaf.path,
                placeholders = encoded.placeholders.len(),
                "Queueing leaf"
            );
            pending.push(self.run_leaf(index, encoded, target_locale));
        }
        let queued = pending.len();

        let mut outcomes: Vec<(usize, MtResult<String>)> = stream::iter(pending)
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let mut translated = 0;
        let mut failures = Vec::new();
        for (index, outcome) in outcomes {
            let leaf = &mut leaves[index];
            match outcome {
                Ok(text) => {
                    *leaf.text = text;
                    translated += 1;
                }
                Err(error) => {
                    warn!(path = %leaf.path, %error, "Leaf translation failed, keeping input text");
                    failures.push(LeafFailure {
                        path: leaf.path.clone(),
                        error,
                    });
                }
            }
        }
        drop(leaves);

        info!(
            provider = self.provider.provider_name(),
            target = target_locale,
            queued,
            translated,
            failed = failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Document translated"
        );

        Ok(TranslatedDocument {
            document,
            translated,
            failures,
        })
    }

    async fn run_leaf(
        &self,
        index: usize,
        encoded: Encoded,
        target_locale: &str,
    ) -> (usize, MtResult<String>) {
        (index, self.translate_leaf(encoded, target_locale).await)
    }

    /// Translate one encoded leaf and restore its markup
    async fn translate_leaf(&self, encoded: Encoded, target_locale: &str) -> MtResult<String> {
        let raw = self
            .provider
            .translate(&encoded.text, &self.options.source_locale, target_locale)
            .await?;

        if raw.trim().is_empty() {
            return Err(MtError::TranslationError(
                "Provider returned an empty translation".to_string(),
            ));
        }

        if self.options.strict_placeholders {
            markup::decode_strict(&raw, &encoded.placeholders)
        } else {
            Ok(markup::decode(&raw, &encoded.placeholders))
        }
    }
}
