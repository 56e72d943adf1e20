// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Currency amounts travel as plain decimal strings such as `"12.25"`.
//!
//! Only an optional `-`, digits and an optional fractional part are accepted;
//! exponents (`"1e3"`), separators (`"1_000"`), signs like `+` and surrounding
//! whitespace are rejected. Negative amounts parse here and are refused by
//! [`Receipt::validate`](super::Receipt::validate).

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serializer};

fn is_plain_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(amount)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if !is_plain_decimal(&raw) {
        return Err(de::Error::custom(format!(
            "invalid amount \"{raw}\": expected a decimal string like \"12.25\""
        )));
    }
    Decimal::from_str(&raw)
        .map_err(|err| de::Error::custom(format!("invalid amount \"{raw}\": {err}")))
}
