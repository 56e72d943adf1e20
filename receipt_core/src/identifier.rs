// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Receipt identifier generation.

use uuid::Uuid;

/// Produces candidate identifiers for new receipts.
///
/// The [`Manager`](crate::manager::Manager) checks every candidate against
/// the stored records and asks for a new one on collision, up to
/// [`MAX_ID_ATTEMPTS`](crate::manager::MAX_ID_ATTEMPTS) times.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

/// Random (version 4) UUIDs, e.g. `7fb1377b-b223-49d9-a31a-5a02701dd310`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuid;

impl IdGenerator for RandomUuid {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
