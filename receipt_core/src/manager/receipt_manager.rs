// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use log::{debug, warn};

use super::adapters::{KeyValueDelete, KeyValueRead, KeyValueStore};
use crate::{
    identifier::{IdGenerator, RandomUuid},
    receipt::{
        key::{duplicate_key, record_key},
        Receipt, StoredReceipt,
    },
    scoring, Error, Result,
};

/// How many identifiers are tried before giving up on a receipt.
pub const MAX_ID_ATTEMPTS: usize = 3;

pub struct Manager<E, G = RandomUuid> {
    /// Context that implements adapters
    context: E,

    /// Source of candidate receipt identifiers
    id_generator: G,
}

impl<E> Manager<E> {
    /// Creates new manager persisting receipts through `context`, with random
    /// UUIDs as identifiers.
    pub fn new(context: E) -> Self {
        Self {
            context,
            id_generator: RandomUuid,
        }
    }
}

impl<E, G> Manager<E, G> {
    /// Replaces the identifier source.
    pub fn with_id_generator<T: IdGenerator>(self, id_generator: T) -> Manager<E, T> {
        Manager {
            context: self.context,
            id_generator,
        }
    }

    pub fn context(&self) -> &E {
        &self.context
    }
}

impl<E, G> Manager<E, G>
where
    E: KeyValueRead + KeyValueStore + KeyValueDelete + Sync,
    G: IdGenerator,
{
    /// Scores `receipt`, stores it under a fresh identifier and returns that
    /// identifier.
    ///
    /// The stored record is written before the duplicate index entry, so a
    /// duplicate hit always points at a readable record. Points are always
    /// computed here; the receipt carries no client-supplied score.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if an amount is negative.
    ///
    /// Returns [`Error::DuplicateReceipt`] if a receipt with the same trimmed
    /// retailer, purchase date, purchase time and total is already stored.
    /// Nothing is written in that case.
    ///
    /// Returns [`Error::IdentifierExhausted`] if [`MAX_ID_ATTEMPTS`]
    /// identifiers in a row were already taken.
    ///
    /// Returns [`Error::AdapterError`] if the backend fails.
    ///
    pub async fn create_receipt(&self, receipt: Receipt) -> Result<String> {
        receipt.validate()?;

        let duplicate_key = duplicate_key(&receipt);
        if self
            .context
            .exists(&duplicate_key)
            .await
            .map_err(Error::adapter)?
        {
            debug!("Rejecting duplicate receipt {duplicate_key}");
            return Err(Error::DuplicateReceipt);
        }

        let points = scoring::score(&receipt);
        let mut stored = StoredReceipt {
            id: String::new(),
            points,
            receipt,
        };

        let id = self.store_under_fresh_id(&mut stored).await?;

        let claimed = self
            .context
            .set_if_absent(&duplicate_key, id.clone())
            .await
            .map_err(Error::adapter);
        match claimed {
            Ok(true) => {
                debug!("Stored receipt {id} with {points} points");
                Ok(id)
            }
            Ok(false) => {
                // A concurrent request claimed the same receipt first.
                self.remove_record(&id).await?;
                debug!("Rejecting duplicate receipt {duplicate_key}");
                Err(Error::DuplicateReceipt)
            }
            Err(err) => {
                if let Err(rollback) = self.remove_record(&id).await {
                    warn!(
                        "Failed to remove receipt {id} after a failed duplicate claim: {rollback}"
                    );
                }
                Err(err)
            }
        }
    }

    /// Returns the points stored for receipt `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no receipt was stored under `id`.
    ///
    /// Returns [`Error::CorruptRecord`] if the stored record cannot be decoded.
    ///
    pub async fn get_points(&self, id: &str) -> Result<i64> {
        Ok(self.get_receipt(id).await?.points)
    }

    /// Returns the stored receipt `id`, including its identifier and points.
    ///
    /// # Errors
    ///
    /// Same as [`Manager::get_points`].
    pub async fn get_receipt(&self, id: &str) -> Result<StoredReceipt> {
        let raw = self
            .context
            .get(&record_key(id))
            .await
            .map_err(Error::adapter)?
            .ok_or_else(|| Error::NotFound { id: id.to_owned() })?;

        serde_json::from_str(&raw).map_err(|source| Error::CorruptRecord {
            id: id.to_owned(),
            source,
        })
    }

    /// Writes `stored` under the first unused identifier and returns it.
    async fn store_under_fresh_id(&self, stored: &mut StoredReceipt) -> Result<String> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            stored.id = self.id_generator.generate();
            let record = serde_json::to_string(&*stored).map_err(Error::Encode)?;

            if self
                .context
                .set_if_absent(&record_key(&stored.id), record)
                .await
                .map_err(Error::adapter)?
            {
                return Ok(stored.id.clone());
            }
            warn!(
                "Identifier collision for receipt ({attempt}/{MAX_ID_ATTEMPTS}): {}",
                stored.id
            );
        }

        Err(Error::IdentifierExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    async fn remove_record(&self, id: &str) -> Result<()> {
        self.context
            .remove(&record_key(id))
            .await
            .map_err(Error::adapter)
    }
}
