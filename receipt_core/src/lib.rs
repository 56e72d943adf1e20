// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
//! ## Getting started
//!
//! Take a look at the [`manager`] module to see how receipts are stored and
//! which adapters a key-value backend has to implement.

mod error;
pub mod identifier;
pub mod manager;
pub mod receipt;
pub mod scoring;

pub use error::{Error, Result};
