// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The `manager` module provides the receipt store: the facilities that accept
//! a receipt, score it and keep it addressable by identifier.
//!
//! This module should be the primary interface for the boundary layer. The
//! [`Manager`] struct rejects duplicate receipts, assigns identifiers, scores
//! accepted receipts with [`crate::scoring::score`] and answers points
//! lookups.
//!
//! The `Manager` uses user-defined adapters (see [adapters]) for storage.
//! Any key-value backend offering an atomic single-key insert-if-absent can be
//! plugged in.

pub mod adapters;
#[cfg(feature = "in_memory")]
pub mod context;
mod receipt_manager;

pub use receipt_manager::{Manager, MAX_ID_ATTEMPTS};
