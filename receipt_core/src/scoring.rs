// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Scoring engine
//!
//! Computes the reward points of a [`Receipt`]. Every rule below contributes
//! independently and the score is their sum:
//!
//! 1. +1 point for every ASCII letter or digit in the retailer name.
//! 2. +50 points if the total is a round dollar amount with no cents.
//! 3. +25 points if the total is a multiple of `0.25`.
//! 4. +5 points for every two items on the receipt.
//! 5. For every item whose trimmed description length is a multiple of 3,
//!    `ceil(price * 0.2)` points.
//! 6. +6 points if the day of the purchase date is odd.
//! 7. +10 points if the purchase time is after 14:01 and before 16:00.
//!
//! Rules 2 and 3 are not exclusive: a total of `10.00` earns both.
//!
//! Scoring is pure and never fails. Amounts are fixed-point decimals, so the
//! modulo and rounding rules are exact.

use chrono::{Datelike, NaiveTime, Timelike};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::receipt::{Item, Receipt};

const ROUND_TOTAL_POINTS: i64 = 50;
const QUARTER_TOTAL_POINTS: i64 = 25;
const ITEM_PAIR_POINTS: i64 = 5;
const ODD_DAY_POINTS: i64 = 6;
const AFTERNOON_POINTS: i64 = 10;

/// Returns the points earned by `receipt`.
pub fn score(receipt: &Receipt) -> i64 {
    [
        retailer_points(&receipt.retailer),
        total_points(receipt.total),
        item_pair_points(receipt.items.len()),
        receipt.items.iter().map(description_points).fold(0, i64::saturating_add),
        odd_day_points(receipt.purchase_date.day()),
        afternoon_points(receipt.purchase_time),
    ]
    .into_iter()
    .fold(0, i64::saturating_add)
}

fn retailer_points(retailer: &str) -> i64 {
    retailer.chars().filter(char::is_ascii_alphanumeric).count() as i64
}

fn total_points(total: Decimal) -> i64 {
    let mut points = 0;
    if total.fract().is_zero() {
        points += ROUND_TOTAL_POINTS;
    }
    if (total % Decimal::new(25, 2)).is_zero() {
        points += QUARTER_TOTAL_POINTS;
    }
    points
}

fn item_pair_points(item_count: usize) -> i64 {
    (item_count / 2) as i64 * ITEM_PAIR_POINTS
}

fn description_points(item: &Item) -> i64 {
    if item.short_description.trim().len() % 3 != 0 {
        return 0;
    }
    (item.price * Decimal::new(2, 1))
        .ceil()
        .to_i64()
        .unwrap_or(i64::MAX)
}

fn odd_day_points(day: u32) -> i64 {
    if day % 2 == 1 {
        ODD_DAY_POINTS
    } else {
        0
    }
}

// The window opens at 14:02, not 14:00.
fn afternoon_points(time: NaiveTime) -> i64 {
    let (hour, minute) = (time.hour(), time.minute());
    if (hour > 14 || (hour == 14 && minute > 1)) && hour < 16 {
        AFTERNOON_POINTS
    } else {
        0
    }
}
