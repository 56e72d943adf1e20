// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

/// Reads values from the key-value backend.
///
/// # Example
///
/// For example code see [crate::manager::context::memory::InMemoryContext]
#[async_trait]
pub trait KeyValueRead {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Returns the value stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<String>, Self::AdapterError>;

    /// Returns `true` if a value is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool, Self::AdapterError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Writes values to the key-value backend.
///
/// # Example
///
/// For example code see [crate::manager::context::memory::InMemoryContext]
#[async_trait]
pub trait KeyValueStore {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Stores `value` under `key` unless the key is already taken.
    ///
    /// Returns `true` if the value was written and `false` if another value
    /// already exists under `key`, in which case nothing is written. The check
    /// and the write must be atomic for a single key: of two concurrent calls
    /// on the same key, at most one may return `true`.
    async fn set_if_absent(&self, key: &str, value: String) -> Result<bool, Self::AdapterError>;
}

/// Removes values from the key-value backend.
///
/// The [`Manager`](crate::manager::Manager) only removes a record it has just
/// written itself, when the receipt turned out to be a duplicate.
#[async_trait]
pub trait KeyValueDelete {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Removes the value stored under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), Self::AdapterError>;
}
