//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use stitch_domain::StitchError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub StitchError);

impl From<InfraError> for StitchError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StitchError> for InfraError {
    fn from(value: StitchError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoStitchError {
    fn into_stitch(self) -> StitchError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → StitchError */
/* -------------------------------------------------------------------------- */

impl IntoStitchError for HttpError {
    fn into_stitch(self) -> StitchError {
        let target = self.url().map(|url| format!(" ({url})")).unwrap_or_default();

        if self.is_timeout() {
            return StitchError::Transport(format!("HTTP request timed out{target}"));
        }

        if self.is_connect() {
            return StitchError::Transport(format!("HTTP connection failure{target}: {self}"));
        }

        if self.is_builder() {
            return StitchError::Transport(format!("invalid HTTP request{target}: {self}"));
        }

        if self.is_body() || self.is_decode() {
            return StitchError::Transport(format!("failed to read HTTP response{target}: {self}"));
        }

        StitchError::Transport(format!("HTTP request failed{target}: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_stitch())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → StitchError */
/* -------------------------------------------------------------------------- */

impl IntoStitchError for JsonError {
    fn into_stitch(self) -> StitchError {
        StitchError::Encode(format!("JSON serialization failed: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_stitch())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → StitchError */
/* -------------------------------------------------------------------------- */

impl IntoStitchError for TomlError {
    fn into_stitch(self) -> StitchError {
        StitchError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_stitch())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
