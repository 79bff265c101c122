//! Core types shared by the synthesizer, body parser and multipart decoder.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tempfile::SpooledTempFile;

/// Key-value pair type for parameters (faster than HashMap for small collections).
pub type ParamList = Vec<(String, String)>;

/// Uploaded files keyed by form field name.
pub type FileList = Vec<(String, UploadedFile)>;

/// Insert a value, replacing an existing key in place (PHP array semantics).
pub fn set_param<V>(list: &mut Vec<(String, V)>, key: String, value: V) {
    match list.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => list.push((key, value)),
    }
}

/// Look up a value by key.
pub fn get_param<'a, V>(list: &'a [(String, V)], key: &str) -> Option<&'a V> {
    list.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

// =============================================================================
// Server Values
// =============================================================================

/// A single `$_SERVER`-style value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServerValue {
    Str(String),
    Int(i64),
}

impl ServerValue {
    /// String payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ServerValue::Str(s) => Some(s),
            ServerValue::Int(_) => None,
        }
    }

    /// Integer payload, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ServerValue::Int(n) => Some(*n),
            ServerValue::Str(_) => None,
        }
    }

    /// Parse a textual value; all-digit strings become integers.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse() {
                return ServerValue::Int(n);
            }
        }
        ServerValue::Str(raw.to_string())
    }
}

impl fmt::Display for ServerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerValue::Str(s) => f.write_str(s),
            ServerValue::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ServerValue {
    fn from(s: &str) -> Self {
        ServerValue::Str(s.to_string())
    }
}

impl From<String> for ServerValue {
    fn from(s: String) -> Self {
        ServerValue::Str(s)
    }
}

impl From<i64> for ServerValue {
    fn from(n: i64) -> Self {
        ServerValue::Int(n)
    }
}

impl From<u16> for ServerValue {
    fn from(n: u16) -> Self {
        ServerValue::Int(i64::from(n))
    }
}

impl PartialEq<str> for ServerValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for ServerValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for ServerValue {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

// =============================================================================
// Environment
// =============================================================================

/// Insertion-ordered server environment (`$_SERVER`).
///
/// Setting an existing key replaces its value without moving it, so a
/// baseline overlaid with caller defaults keeps the baseline's key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(Cow<'static, str>, ServerValue)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vars: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ServerValue> {
        self.vars.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a value, replacing in place if the key already exists.
    pub fn set(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<ServerValue>) {
        let key = key.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.vars.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ServerValue> {
        let pos = self.vars.iter().position(|(k, _)| k == key)?;
        Some(self.vars.remove(pos).1)
    }

    /// Overlay another environment on top of this one (`array_replace`).
    pub fn extend_from(&mut self, other: &Environment) {
        for (k, v) in &other.vars {
            self.set(k.clone(), v.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServerValue)> {
        self.vars.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(k, _)| k.as_ref())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Render as a JSON object for diagnostics.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<Cow<'static, str>>,
    V: Into<ServerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (k, v) in iter {
            env.set(k, v);
        }
        env
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.vars.len()))?;
        for (k, v) in &self.vars {
            map.serialize_entry(k.as_ref(), v)?;
        }
        map.end()
    }
}

// =============================================================================
// Uploaded File
// =============================================================================

/// PHP upload status codes.
pub mod upload_error {
    /// Upload succeeded.
    pub const OK: u8 = 0;
    /// File exceeds the configured maximum size.
    pub const INI_SIZE: u8 = 1;
}

/// Represents an uploaded file from multipart form data.
///
/// The stream is positioned at the start. Closing it is the owner's job;
/// dropping the value releases any spilled temporary file.
#[derive(Debug)]
pub struct UploadedFile {
    /// File contents (in memory until the spool threshold, then on disk)
    pub stream: SpooledTempFile,
    /// File size in bytes
    pub size: u64,
    /// PHP upload error code (0 = success)
    pub error: u8,
    /// Original filename
    pub client_filename: Option<String>,
    /// MIME type
    pub client_media_type: Option<String>,
}

impl UploadedFile {
    /// Whether the upload completed without error.
    pub fn is_ok(&self) -> bool {
        self.error == upload_error::OK
    }

    /// Read the whole stream, leaving it rewound.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.stream.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::with_capacity(self.size as usize);
        self.stream.read_to_end(&mut buf)?;
        self.stream.seek(SeekFrom::Start(0))?;
        Ok(buf)
    }
}
