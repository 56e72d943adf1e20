// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Receipt data model.
//!
//! A [`Receipt`] is what a client submits: retailer, purchase date and time,
//! purchased items and the total. Once accepted by the
//! [`Manager`](crate::manager::Manager) it is persisted as a [`StoredReceipt`],
//! which adds the server-assigned identifier and the points computed at
//! creation time.

mod amount;
pub mod key;
mod model;
mod purchase_time;

pub use model::{Item, Receipt, StoredReceipt};
