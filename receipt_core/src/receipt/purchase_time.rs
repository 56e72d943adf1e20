// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! 24h `HH:MM` (de)serialization for [`NaiveTime`].
//!
//! Hour and minute are exactly two digits each: `09:05` parses, `9:5` does not.

use chrono::NaiveTime;
use serde::{de, Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !well_formed {
        return Err(de::Error::custom(format!(
            "invalid purchaseTime \"{raw}\": expected HH:MM"
        )));
    }
    NaiveTime::parse_from_str(&raw, FORMAT)
        .map_err(|err| de::Error::custom(format!("invalid purchaseTime \"{raw}\": {err}")))
}
