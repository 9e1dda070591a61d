//! Google Cloud Translation (v2, Basic) backend
//!
//! Each leaf is one `POST {base}?key=…` with a single-element `q` array.
//! Before the first leaf of a document, `check_ready` lists the supported
//! languages; that call fails fast on an unreachable host or a rejected key,
//! so a bad setup surfaces as one `ConfigError` rather than a failure on
//! every leaf.
//!
//! The key comes from `GOOGLE_TRANSLATE_API_KEY` (see `from_env`).

use crate::error::{MtError, MtResult};
use crate::translator::{MachineTranslator, to_bcp47, validate_locale};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google's per-request limit on `q`, in characters
const MAX_TEXT_CHARS: usize = 30_000;

#[derive(Clone)]
pub struct GoogleTranslateProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Build a provider for `api_key`; a blank key is a `ConfigError`
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::ConfigError(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            MtError::ConfigError(format!("{} environment variable not set", API_KEY_ENV))
        })?;

        Self::new(api_key)
    }

    /// Send requests somewhere other than `translation.googleapis.com`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// JSON body for one leaf
    ///
    /// `format: "text"` stops Google from HTML-escaping quotes and
    /// ampersands, which would otherwise leak into the file.
    fn request_body(text: &str, source_locale: &str, target_locale: &str) -> Value {
        json!({
            "q": [text],
            "source": to_bcp47(source_locale),
            "target": to_bcp47(target_locale),
            "format": "text"
        })
    }

    /// `data.translations[0].translatedText`
    fn extract_translation(body: &Value) -> MtResult<String> {
        body["data"]["translations"]
            .get(0)
            .and_then(|t| t["translatedText"].as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                MtError::TranslationError(
                    "Response has no data.translations[0].translatedText".to_string(),
                )
            })
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(MtError::TranslationError(format!(
                "Leaf of {} characters is over the {} character request limit",
                chars, MAX_TEXT_CHARS
            )));
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&Self::request_body(text, source_locale, target_locale))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            // A 4xx here is about this leaf (bad language pair, quota); the
            // key itself was already accepted by check_ready.
            return Err(MtError::TranslationError(format!(
                "Google Translate returned {}: {}",
                status, detail
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Unreadable Google Translate response: {}", e))
        })?;

        Self::extract_translation(&body)
    }

    async fn check_ready(&self) -> MtResult<()> {
        let url = format!("{}/languages?key={}", self.base_url, self.api_key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                MtError::ConfigError(format!(
                    "Google Translate unreachable at {}: {}",
                    self.base_url, e
                ))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response.text().await.unwrap_or_default();
        let reason = if status.is_client_error() {
            "rejected the API key"
        } else {
            "is unavailable"
        };
        Err(MtError::ConfigError(format!(
            "Google Translate at {} {} ({}): {}",
            self.base_url, reason, status, detail
        )))
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
