// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Context adapters for the receipt manager.
//!
//! Each adapter should be implemented by the user of the library for the
//! key-value backend they want receipts persisted in. The manager only ever
//! talks to storage through these traits, which keeps it independent of the
//! storage engine.

mod key_value;

pub use key_value::*;
