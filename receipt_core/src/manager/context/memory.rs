// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory context implementation for the receipt manager.
//!
//! This module provides an in-memory implementation of the key-value adapters.
//! It backs the receipt processor service and is useful for testing and
//! development purposes.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use thiserror::Error;

use crate::manager::adapters::*;

pub type KeyValueStorage = Arc<RwLock<HashMap<String, String>>>;

#[derive(Debug, Error)]
pub enum InMemoryError {
    #[error("something went wrong: {error}")]
    AdapterError { error: String },
}

fn poisoned<T>(_: T) -> InMemoryError {
    InMemoryError::AdapterError {
        error: "key-value storage lock poisoned".to_owned(),
    }
}

#[derive(Clone, Default)]
pub struct InMemoryContext {
    /// local key-value store with rwlocks to allow sharing with other components as needed
    storage: KeyValueStorage,
}

impl InMemoryContext {
    pub fn new(storage: KeyValueStorage) -> Self {
        InMemoryContext { storage }
    }

    /// Number of keys currently stored, records and duplicate index entries alike.
    pub fn len(&self) -> Result<usize, InMemoryError> {
        Ok(self.storage.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, InMemoryError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl KeyValueRead for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::AdapterError> {
        let storage = self.storage.read().map_err(poisoned)?;
        Ok(storage.get(key).cloned())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn set_if_absent(&self, key: &str, value: String) -> Result<bool, Self::AdapterError> {
        let mut storage = self.storage.write().map_err(poisoned)?;
        match storage.entry(key.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(true)
            }
        }
    }
}

#[async_trait]
impl KeyValueDelete for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn remove(&self, key: &str) -> Result<(), Self::AdapterError> {
        let mut storage = self.storage.write().map_err(poisoned)?;
        storage.remove(key);
        Ok(())
    }
}
