// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Context implementations.
//!
//! Contexts implement the key-value adapters the manager persists receipts
//! through. Currently, there's only one context implementation available,
//! [`memory::InMemoryContext`], which keeps everything in process memory.
pub mod memory;
