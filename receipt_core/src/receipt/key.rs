// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Key scheme used on the key-value backend.
//!
//! Stored records live under `receipt:<id>`. The duplicate index maps
//! `duplicate:<retailer>+<date>+<time>+<total>` to the identifier of the
//! receipt that claimed it.

use super::Receipt;

const RECORD_PREFIX: &str = "receipt:";
const DUPLICATE_PREFIX: &str = "duplicate:";

/// Key of the stored record for receipt `id`.
pub fn record_key(id: &str) -> String {
    format!("{RECORD_PREFIX}{id}")
}

/// Duplicate-detection key of `receipt`.
///
/// Only the trimmed retailer, purchase date, purchase time and total take
/// part; items never do. The total is normalized so that `35.35` and
/// `35.350` produce the same key.
pub fn duplicate_key(receipt: &Receipt) -> String {
    format!(
        "{DUPLICATE_PREFIX}{}+{}+{}+{}",
        receipt.retailer.trim(),
        receipt.purchase_date.format("%Y-%m-%d"),
        receipt.purchase_time.format("%H:%M"),
        receipt.total.normalize(),
    )
}
