//! Form payload model

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ContentSignature;

/// Field contents of one form submission, in field order.
///
/// Binary attachments travel as two plain string fields, see
/// [`FormPayload::attach`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPayload(IndexMap<String, String>);

impl FormPayload {
    /// Create an empty payload
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. An existing field keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style [`FormPayload::insert`]
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the payload has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Attach a file as `<field>Base64` (standard base64) and `<field>Name`.
    pub fn attach(&mut self, field: &str, filename: &str, bytes: &[u8]) {
        let (data_field, name_field) = attachment_fields(field);
        self.insert(data_field, STANDARD.encode(bytes));
        self.insert(name_field, filename);
    }

    /// Content signature of this payload, independent of field order
    pub fn signature(&self) -> ContentSignature {
        ContentSignature::of(self)
    }
}

impl<K, V> FromIterator<(K, V)> for FormPayload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (name, value) in iter {
            payload.insert(name, value);
        }
        payload
    }
}

/// Field names carrying an attachment's data and filename.
pub fn attachment_fields(field: &str) -> (String, String) {
    (format!("{field}Base64"), format!("{field}Name"))
}
