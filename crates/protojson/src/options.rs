//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::key::KeyMode;

/// What the reader does with keys that match no field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Skip the value structurally.
    #[default]
    Skip,
    /// Fail with [`CodecError::UnknownField`](crate::CodecError::UnknownField).
    Reject,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings fixed for the lifetime of one [`JsonCodec`](crate::JsonCodec).
///
/// ```
/// use protojson::{CodecOptions, KeyMode};
///
/// let opts = CodecOptions::from_json_str(r#"{"keyMode": "numeric"}"#).unwrap();
/// assert_eq!(opts.key_mode, KeyMode::Numeric);
/// assert_eq!(opts.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodecOptions {
    pub key_mode: KeyMode,
    pub unknown_fields: UnknownFieldPolicy,
    /// Deepest object/array nesting the reader accepts.
    pub max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            key_mode: KeyMode::Name,
            unknown_fields: UnknownFieldPolicy::Skip,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecOptions {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
