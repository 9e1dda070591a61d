//! The seam between the tree walker and a translation backend
//!
//! `TreeTranslator` only ever sees a `MachineTranslator`: one call per
//! `"translated"` leaf, with markup already swapped for `{{token}}` anchors,
//! plus a single `check_ready` before the first leaf of every document.
//!
//! ```ignore
//! let provider: Arc<dyn MachineTranslator> = Arc::new(GoogleTranslateProvider::from_env()?);
//! provider.check_ready().await?;
//! let text = provider.translate("Open {{4be1...}}", "en", "pt-BR").await?;
//! ```

use crate::error::{MtError, MtResult};
use async_trait::async_trait;

/// A backend able to translate one string at a time
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate `text` from `source_locale` into `target_locale`
    ///
    /// Anchor tokens (`{{...}}`) in `text` must come back verbatim; anything
    /// the backend does to them is caught when the leaf is decoded.
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Check that the provider can be used at all
    ///
    /// Called once per document, before any leaf is sent. A failure here
    /// aborts the whole document instead of failing every leaf separately.
    async fn check_ready(&self) -> MtResult<()> {
        Ok(())
    }

    /// Name of this translation provider, for logging
    fn provider_name(&self) -> &str;
}

/// Spell a locale the way BCP 47 does: `pt_BR` → `pt-BR`
///
/// Region and script subtags are kept. `zh-TW` and `zh-CN` are different
/// targets and must reach the provider as such.
pub fn to_bcp47(locale: &str) -> String {
    locale.trim().replace('_', "-")
}

/// Reject locale codes that cannot be a language tag
///
/// Accepts ASCII alphanumerics, hyphens and underscores only.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.trim().is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if let Some(bad) = locale
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid character {:?} in locale code: {}",
            bad, locale
        )));
    }

    Ok(())
}
