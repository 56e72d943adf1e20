// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod error;
pub mod metrics;
pub mod responses;
pub mod server;
