// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A purchased item as listed on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub short_description: String,
    #[serde(with = "super::amount")]
    pub price: Decimal,
}

/// A receipt as submitted by a client.
///
/// Server-assigned fields (`id`, `points`) are not part of this type, so any
/// value a client sends for them is dropped while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub retailer: String,
    pub purchase_date: NaiveDate,
    #[serde(with = "super::purchase_time")]
    pub purchase_time: NaiveTime,
    pub items: Vec<Item>,
    #[serde(with = "super::amount")]
    pub total: Decimal,
}

impl Receipt {
    /// Parses and validates a receipt from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the body is not valid JSON, if a
    /// date, time or amount cannot be parsed, or if an amount is negative.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let receipt: Receipt = serde_json::from_slice(bytes).map_err(|err| Error::Validation {
            reason: err.to_string(),
        })?;
        receipt.validate()?;
        Ok(receipt)
    }

    /// Checks the invariants serde cannot express: amounts are never negative.
    pub fn validate(&self) -> Result<()> {
        if self.total < Decimal::ZERO {
            return Err(Error::Validation {
                reason: format!("total must not be negative, got {}", self.total),
            });
        }
        if let Some(item) = self
            .items
            .iter()
            .find(|item| item.price < Decimal::ZERO)
        {
            return Err(Error::Validation {
                reason: format!(
                    "price of \"{}\" must not be negative, got {}",
                    item.short_description, item.price
                ),
            });
        }
        Ok(())
    }
}

/// The persisted form of an accepted receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReceipt {
    pub id: String,
    pub points: i64,
    #[serde(flatten)]
    pub receipt: Receipt,
}
