//! Translation between the canonical model and the wire payloads.
//!
//! One submodule per resource kind, each with the same three pure functions:
//! - `to_create_request` - every settable attribute of the model
//! - `to_update_request` - only the attributes the edit endpoint accepts
//! - `from_response` - normalize a response payload back into the model
//!
//! Normalization is where the remote sentinels disappear: empty strings and
//! a zero color become `None`, and encoded secrets are decoded.

use thiserror::Error;

use crate::codec::{self, CodecError};
use crate::secret::Secret;

pub mod folder;
pub mod password;
pub mod vault;

pub use vault::VaultKeys;

/// Error type for model conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A secret field could not be decoded.
    #[error("failed to decode {field}: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: CodecError,
    },

    /// A field required by the conversion is absent.
    #[error("missing required field: {field}")]
    Missing { field: &'static str },
}

/// Treat the remote empty-string sentinel as absence.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Decode an optional wire secret, mapping the empty sentinel to absence.
pub(crate) fn decode_optional(
    field: &'static str,
    wire: Option<String>,
) -> Result<Option<Secret>, ConvertError> {
    match non_empty(wire) {
        Some(wire) => codec::decode(&wire)
            .map(Some)
            .map_err(|source| ConvertError::Decode { field, source }),
        None => Ok(None),
    }
}
