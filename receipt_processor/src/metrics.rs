// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Prometheus exposition endpoint.
//!
//! The counters themselves are registered into the global registry where they
//! are incremented (see [`crate::server`]).

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Router};
use log::{error, info};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;

/// Renders every metric of the global registry in the text exposition format.
pub fn render() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

async fn handle_metrics() -> (StatusCode, String) {
    match render() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub async fn run_server(port: u16) {
    let app = Router::new().route("/metrics", get(handle_metrics));

    let listener = match TcpListener::bind(&format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind metrics server to port {port}: {e}");
            return;
        }
    };
    info!("Metrics server listening on port {port}.");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Metrics server error: {e}");
    }
}

#[cfg(test)]
mod tests {
    use prometheus::register_int_counter;

    use super::*;

    #[test]
    fn render_includes_registered_counters() {
        let counter = register_int_counter!(
            "metrics_render_test_count",
            "Counter only used by the metrics render test."
        )
        .unwrap();
        counter.inc();

        let body = render().unwrap();

        assert!(body.contains("metrics_render_test_count 1"));
    }
}
