//! Machine translation for nested JSON localization files
//!
//! Localization files are JSON trees of translation records:
//!
//! ```json
//! { "greeting": { "original": "Hi", "translated": "Hi <b>there</b>" } }
//! ```
//!
//! `TreeTranslator` walks such a tree and machine translates every
//! `"translated"` string, leaving `"original"` and all other values alone.
//! Bold, italic and link markup as well as `${...}` interpolations are
//! swapped for anchor tokens before translation and restored afterwards.
//!
//! # Workflow Example
//!
//! ```ignore
//! use locale_tree::{GoogleTranslateProvider, TranslateOptions, TreeTranslator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let translator = TreeTranslator::new(Arc::new(provider))
//!         .with_options(TranslateOptions::default().with_concurrency(4));
//!
//!     let input = std::fs::read_to_string("messages.json")?;
//!     let result = translator.translate_json(&input, "es").await?;
//!
//!     for failure in &result.failures {
//!         eprintln!("{}: {}", failure.path, failure.error);
//!     }
//!     println!("{}", serde_json::to_string_pretty(&result.document.into_value())?);
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod google_translate;
pub mod markup;
pub mod mock;
pub mod translator;
pub mod tree;


// Re-export main types for convenient access
pub use document::{Document, TextLeaf, Translated, TranslationRecord};
pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use markup::{Encoded, Placeholder, PlaceholderMap, decode, decode_strict, encode};
pub use mock::{MockMode, MockTranslator};
pub use translator::{MachineTranslator, to_bcp47, validate_locale};
pub use tree::{LeafFailure, TranslateOptions, TranslatedDocument, TreeTranslator};
