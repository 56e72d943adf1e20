// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Body returned by `POST /receipts/process`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProcessResponse {
    pub id: String,
}

/// Body returned by `GET /receipts/{id}/points`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PointsResponse {
    pub points: i64,
}
