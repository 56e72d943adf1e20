// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use log::{debug, error, info};
use prometheus::{register_int_counter, IntCounter};
use receipt_core::{
    manager::{context::memory::InMemoryContext, Manager},
    receipt::{Receipt, StoredReceipt},
    Error,
};
use tokio::{net::TcpListener, signal, task::JoinHandle};

use crate::{
    error::ApiError,
    responses::{PointsResponse, ProcessResponse},
};

// Register the metrics into the global metrics registry.
lazy_static! {
    static ref RECEIPTS_PROCESSED_COUNTER: IntCounter = register_int_counter!(
        "receipts_processed_count",
        "Number of receipts successfully scored and stored."
    )
    .unwrap();
    static ref RECEIPTS_DUPLICATE_COUNTER: IntCounter = register_int_counter!(
        "receipts_duplicate_count",
        "Number of receipts rejected as duplicates."
    )
    .unwrap();
    static ref RECEIPTS_REJECTED_COUNTER: IntCounter = register_int_counter!(
        "receipts_rejected_count",
        "Number of receipts rejected because they failed validation."
    )
    .unwrap();
    static ref RECEIPTS_FAILURE_COUNTER: IntCounter = register_int_counter!(
        "receipts_failure_count",
        "Number of receipts that could not be stored because of a server-side error."
    )
    .unwrap();
    static ref POINTS_LOOKUP_COUNTER: IntCounter = register_int_counter!(
        "points_lookup_count",
        "Number of successful points lookups."
    )
    .unwrap();
    static ref POINTS_LOOKUP_MISS_COUNTER: IntCounter = register_int_counter!(
        "points_lookup_miss_count",
        "Number of points lookups for unknown receipt identifiers."
    )
    .unwrap();
}

pub type SharedManager = Arc<Manager<InMemoryContext>>;

async fn process_receipt(
    State(manager): State<SharedManager>,
    body: Bytes,
) -> Result<Json<ProcessResponse>, ApiError> {
    let result = match Receipt::from_json(&body) {
        Ok(receipt) => manager.create_receipt(receipt).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(id) => {
            RECEIPTS_PROCESSED_COUNTER.inc();
            debug!("Processed receipt {id}");
            Ok(Json(ProcessResponse { id }))
        }
        Err(e) => {
            match e {
                Error::Validation { .. } => RECEIPTS_REJECTED_COUNTER.inc(),
                Error::DuplicateReceipt => RECEIPTS_DUPLICATE_COUNTER.inc(),
                _ => RECEIPTS_FAILURE_COUNTER.inc(),
            }
            Err(e.into())
        }
    }
}

async fn get_points(
    State(manager): State<SharedManager>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, ApiError> {
    match manager.get_points(&id).await {
        Ok(points) => {
            POINTS_LOOKUP_COUNTER.inc();
            Ok(Json(PointsResponse { points }))
        }
        Err(e) => {
            if let Error::NotFound { .. } = e {
                POINTS_LOOKUP_MISS_COUNTER.inc();
            }
            Err(e.into())
        }
    }
}

async fn get_receipt(
    State(manager): State<SharedManager>,
    Path(id): Path<String>,
) -> Result<Json<StoredReceipt>, ApiError> {
    Ok(Json(manager.get_receipt(&id).await?))
}

/// Builds the receipt API router around `manager`.
pub fn create_router(
    manager: SharedManager,
    max_request_body_size: usize,
    max_concurrent_connections: usize,
) -> Router {
    Router::new()
        .route("/receipts/process", post(process_receipt))
        .route("/receipts/{id}/points", get(get_points))
        .route("/receipts/{id}", get(get_receipt))
        .layer(DefaultBodyLimit::max(max_request_body_size))
        .layer(tower::limit::ConcurrencyLimitLayer::new(
            max_concurrent_connections,
        ))
        .with_state(manager)
}

pub async fn run_server(
    port: u16,
    manager: SharedManager,
    max_request_body_size: usize,
    max_concurrent_connections: usize,
) -> Result<(JoinHandle<()>, std::net::SocketAddr)> {
    let router = create_router(manager, max_request_body_size, max_concurrent_connections);

    // Create a `TcpListener` using tokio.
    let listener = TcpListener::bind(&format!("0.0.0.0:{port}")).await?;

    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_handler())
            .await
        {
            error!("Receipt processor error: {e}");
        }
    });

    Ok((handle, addr))
}

/// Graceful shutdown handler
async fn shutdown_handler() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
