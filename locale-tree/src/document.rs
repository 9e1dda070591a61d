//! Document model for localization files
//!
//! A localization file is a JSON tree whose interesting leaves are
//! *translation records*: objects carrying an `"original"` and/or a
//! `"translated"` key.
//!
//! ```json
//! {
//!     "greeting": { "original": "Hi", "translated": "Hi <b>there</b>" },
//!     "menu": [
//!         { "original": "Open", "translated": "Open", "shortcut": "Ctrl+O" }
//!     ],
//!     "version": 3
//! }
//! ```
//!
//! The record check happens once, while converting from `serde_json::Value`,
//! so the translator can match on `Document` exhaustively instead of comparing
//! key names at every level.

use crate::error::{MtError, MtResult};
use serde_json::{Map, Number, Value};

/// Key holding the reviewed source text, never modified
pub const ORIGINAL_KEY: &str = "original";
/// Key holding the text to machine translate
pub const TRANSLATED_KEY: &str = "translated";

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Document>),
    /// Plain object, entries in input order (serde_json `preserve_order`)
    Mapping(Vec<(String, Document)>),
    Record(TranslationRecord),
}

/// An object with an `"original"` and/or `"translated"` key
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRecord {
    /// Raw `"original"` value, kept verbatim
    pub original: Option<Value>,
    pub translated: Option<Translated>,
    /// Any other keys of the record
    pub fields: Vec<(String, Document)>,
    /// Every key in input order, so output objects keep the file's layout
    keys: Vec<String>,
}

/// What a record holds under `"translated"`
#[derive(Debug, Clone, PartialEq)]
pub enum Translated {
    /// A string: the only thing that ever gets translated
    Text(String),
    /// A list, walked like any other sequence
    Sequence(Vec<Document>),
    /// Objects and scalars, copied unchanged
    Opaque(Value),
}

/// Mutable handle on a translatable string and where it sits in the tree
#[derive(Debug)]
pub struct TextLeaf<'a> {
    /// Dotted JSON path, e.g. `menu[0].translated`
    pub path: String,
    pub text: &'a mut String,
}

impl Document {
    /// Parse JSON text whose root must be an object
    pub fn parse(input: &str) -> MtResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_root(value)
    }

    /// Convert a JSON value whose root must be an object
    pub fn from_root(value: Value) -> MtResult<Self> {
        if !value.is_object() {
            return Err(MtError::InputFormatError(format!(
                "root must be an object, found {}",
                json_kind(&value)
            )));
        }
        Ok(Self::from_value(value))
    }

    /// Convert any JSON value, deciding record status for every object
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => Document::Number(n),
            Value::String(s) => Document::String(s),
            Value::Array(items) => Document::Sequence(from_values(items)),
            Value::Object(map) => {
                if map.contains_key(ORIGINAL_KEY) || map.contains_key(TRANSLATED_KEY) {
                    Document::Record(TranslationRecord::from_map(map))
                } else {
                    Document::Mapping(
                        map.into_iter()
                            .map(|(key, value)| (key, Document::from_value(value)))
                            .collect(),
                    )
                }
            }
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(b),
            Document::Number(n) => Value::Number(n),
            Document::String(s) => Value::String(s),
            Document::Sequence(items) => Value::Array(into_values(items)),
            Document::Mapping(entries) => Value::Object(into_map(entries)),
            Document::Record(record) => record.into_value(),
        }
    }

    /// Number of `"translated"` strings in the tree, empty ones included
    pub fn leaf_count(&self) -> usize {
        match self {
            Document::Sequence(items) => items.iter().map(Document::leaf_count).sum(),
            Document::Mapping(entries) => entries.iter().map(|(_, d)| d.leaf_count()).sum(),
            Document::Record(record) => {
                let own = match &record.translated {
                    Some(Translated::Text(_)) => 1,
                    Some(Translated::Sequence(items)) => {
                        items.iter().map(Document::leaf_count).sum()
                    }
                    Some(Translated::Opaque(_)) | None => 0,
                };
                own + record
                    .fields
                    .iter()
                    .map(|(_, d)| d.leaf_count())
                    .sum::<usize>()
            }
            _ => 0,
        }
    }

    /// Collect every `"translated"` string with its path
    ///
    /// Records are visited in document order; within a record, strings in
    /// its other keys come before its own `"translated"` text.
    pub fn text_leaves_mut(&mut self) -> Vec<TextLeaf<'_>> {
        let mut leaves = Vec::new();
        collect_leaves(self, String::new(), &mut leaves);
        leaves
    }
}

impl TranslationRecord {
    fn from_map(map: Map<String, Value>) -> Self {
        let mut record = TranslationRecord {
            original: None,
            translated: None,
            fields: Vec::new(),
            keys: map.keys().cloned().collect(),
        };
        for (key, value) in map {
            match key.as_str() {
                ORIGINAL_KEY => record.original = Some(value),
                TRANSLATED_KEY => {
                    record.translated = Some(match value {
                        Value::String(s) => Translated::Text(s),
                        Value::Array(items) => Translated::Sequence(from_values(items)),
                        other => Translated::Opaque(other),
                    })
                }
                _ => record.fields.push((key, Document::from_value(value))),
            }
        }
        record
    }

    fn into_value(self) -> Value {
        let mut entries: Vec<(String, Value)> = self
            .fields
            .into_iter()
            .map(|(key, document)| (key, document.into_value()))
            .collect();
        if let Some(original) = self.original {
            entries.push((ORIGINAL_KEY.to_string(), original));
        }
        if let Some(translated) = self.translated {
            let value = match translated {
                Translated::Text(s) => Value::String(s),
                Translated::Sequence(items) => Value::Array(into_values(items)),
                Translated::Opaque(value) => value,
            };
            entries.push((TRANSLATED_KEY.to_string(), value));
        }
        let keys = self.keys;
        entries.sort_by_key(|(key, _)| keys.iter().position(|k| k == key));
        Value::Object(entries.into_iter().collect())
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::from_value(value)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}

fn from_values(items: Vec<Value>) -> Vec<Document> {
    items.into_iter().map(Document::from_value).collect()
}

fn into_values(items: Vec<Document>) -> Vec<Value> {
    items.into_iter().map(Document::into_value).collect()
}

fn into_map(entries: Vec<(String, Document)>) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, document)| (key, document.into_value()))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn collect_leaves<'a>(document: &'a mut Document, path: String, out: &mut Vec<TextLeaf<'a>>) {
    match document {
        Document::Sequence(items) => collect_sequence(items, &path, out),
        Document::Mapping(entries) => {
            for (key, child) in entries.iter_mut() {
                let key_path = child_path(&path, key);
                collect_leaves(child, key_path, out);
            }
        }
        Document::Record(record) => {
            for (key, child) in record.fields.iter_mut() {
                let key_path = child_path(&path, key);
                collect_leaves(child, key_path, out);
            }
            let translated_path = child_path(&path, TRANSLATED_KEY);
            match &mut record.translated {
                Some(Translated::Text(text)) => out.push(TextLeaf {
                    path: translated_path,
                    text,
                }),
                Some(Translated::Sequence(items)) => {
                    collect_sequence(items, &translated_path, out)
                }
                Some(Translated::Opaque(_)) | None => {}
            }
        }
        Document::Null | Document::Bool(_) | Document::Number(_) | Document::String(_) => {}
    }
}

fn collect_sequence<'a>(items: &'a mut [Document], path: &str, out: &mut Vec<TextLeaf<'a>>) {
    for (index, item) in items.iter_mut().enumerate() {
        collect_leaves(item, format!("{}[{}]", path, index), out);
    }
}
