// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::result::Result as StdResult;

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Invalid receipt: {reason}")]
    Validation { reason: String },
    #[error("duplicate receipt")]
    DuplicateReceipt,
    #[error("could not create a unique identifier for receipt after {attempts} attempts")]
    IdentifierExhausted { attempts: usize },
    #[error("No receipt found for id {id}")]
    NotFound { id: String },
    #[error("Stored receipt {id} could not be decoded: {source}")]
    CorruptRecord {
        id: String,
        source: serde_json::Error,
    },
    #[error("Failed to encode receipt: {0}")]
    Encode(serde_json::Error),
    #[error("Error from adapter.\n Caused by: {source_error}")]
    AdapterError { source_error: anyhow::Error },
}

impl Error {
    pub(crate) fn adapter<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::AdapterError {
            source_error: anyhow::Error::new(err),
        }
    }
}

pub type Result<T> = StdResult<T, Error>;
