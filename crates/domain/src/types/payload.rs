//! Structured payloads sealed inside record ciphertexts
//!
//! [`KeyEventPayload`] is what capture front-ends produce. [`EventPayload`]
//! is what readers get back: any JSON object, since stored payloads may
//! carry fields this version does not know about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::IndexFields;
use crate::constants::DEFAULT_WIDGET;

/// A captured key press
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventPayload {
    /// Literal character when printable, otherwise `null`
    #[serde(rename = "char")]
    pub character: Option<String>,
    pub keysym: String,
    #[serde(default)]
    pub keycode: i64,
    #[serde(default = "default_widget")]
    pub widget: String,
}

impl KeyEventPayload {
    /// Build a payload from raw capture data
    ///
    /// `character` is kept only when it is non-empty and contains no control
    /// characters. A missing keycode becomes 0.
    pub fn new(
        character: Option<&str>,
        keysym: impl Into<String>,
        keycode: Option<i64>,
        widget: impl Into<String>,
    ) -> Self {
        let character = character
            .filter(|c| !c.is_empty() && !c.chars().any(char::is_control))
            .map(str::to_owned);

        Self { character, keysym: keysym.into(), keycode: keycode.unwrap_or(0), widget: widget.into() }
    }

    /// Payload for the default capture surface
    pub fn from_key(character: Option<&str>, keysym: impl Into<String>, keycode: Option<i64>) -> Self {
        Self::new(character, keysym, keycode, DEFAULT_WIDGET)
    }

    /// Plaintext fields stored alongside the ciphertext
    pub fn index_fields(&self) -> IndexFields {
        IndexFields::new(self.keysym.clone(), self.keycode)
    }
}

fn default_widget() -> String {
    DEFAULT_WIDGET.to_owned()
}

/// A decrypted payload with an open field set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventPayload(Map<String, Value>);

impl EventPayload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// One-line summary: the character, else the keysym, else empty
    pub fn preview(&self) -> String {
        self.non_empty_str("char").or_else(|| self.non_empty_str("keysym")).unwrap_or_default()
    }

    /// `key: value` lines in sorted key order
    ///
    /// Strings render without quotes; other values render as compact JSON.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let value = match &self.0[key] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{key}: {value}")
            })
            .collect()
    }

    /// Interpret the payload as a key event, if it has that shape
    pub fn as_key_event(&self) -> Option<KeyEventPayload> {
        serde_json::from_value(Value::Object(self.0.clone())).ok()
    }

    fn non_empty_str(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_owned)
    }
}

impl From<Map<String, Value>> for EventPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
