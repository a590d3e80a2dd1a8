// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures talking to the finance API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("developer token rejected (401)")]
    Unauthorized,
    #[error("developer token lacks access (403)")]
    Forbidden,
    #[error("resource not found (404)")]
    NotFound,
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("rejected record in response: {0}")]
    Ingest(#[from] IngestError),
}

impl ClientError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            _ => ClientError::Server { status, body },
        }
    }
}

/// Why a single wire record was rejected at the ingestion boundary.
#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("invalid decimal '{value}' in {field}")]
    InvalidDecimal { field: &'static str, value: String },
    #[error("{field} '{value}' exceeds the accepted magnitude")]
    AmountOutOfRange { field: &'static str, value: String },
    #[error("invalid date '{value}' in {field}")]
    InvalidDate { field: &'static str, value: String },
    #[error("unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },
}
