// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, RwLock},
};

use async_trait::async_trait;
use receipt_core::{
    identifier::IdGenerator,
    manager::{
        adapters::{KeyValueDelete, KeyValueRead, KeyValueStore},
        context::memory::{InMemoryContext, InMemoryError, KeyValueStorage},
        Manager, MAX_ID_ATTEMPTS,
    },
    receipt::{Item, Receipt},
    Error,
};
use rstest::*;

/// Hands out a fixed list of identifiers, in order.
struct Sequence(Mutex<VecDeque<&'static str>>);

impl Sequence {
    fn new(ids: &[&'static str]) -> Self {
        Self(Mutex::new(ids.iter().copied().collect()))
    }
}

impl IdGenerator for Sequence {
    fn generate(&self) -> String {
        self.0.lock().unwrap().pop_front().unwrap().to_owned()
    }
}

/// Always hands out the same identifier.
struct Fixed(&'static str);

impl IdGenerator for Fixed {
    fn generate(&self) -> String {
        self.0.to_owned()
    }
}

/// Context that never reports duplicate index entries on reads, as if
/// another request claimed the receipt between the duplicate check and the
/// write.
#[derive(Clone)]
struct RacingContext(InMemoryContext);

#[async_trait]
impl KeyValueRead for RacingContext {
    type AdapterError = InMemoryError;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::AdapterError> {
        if key.starts_with("duplicate:") {
            return Ok(None);
        }
        self.0.get(key).await
    }
}

#[async_trait]
impl KeyValueStore for RacingContext {
    type AdapterError = InMemoryError;

    async fn set_if_absent(&self, key: &str, value: String) -> Result<bool, Self::AdapterError> {
        self.0.set_if_absent(key, value).await
    }
}

#[async_trait]
impl KeyValueDelete for RacingContext {
    type AdapterError = InMemoryError;

    async fn remove(&self, key: &str) -> Result<(), Self::AdapterError> {
        self.0.remove(key).await
    }
}

/// Context whose backend fails when claiming duplicate index entries, and
/// optionally when removing records as well.
#[derive(Clone)]
struct BrokenClaimContext {
    inner: InMemoryContext,
    fail_remove: bool,
}

fn backend_down(operation: &str) -> InMemoryError {
    InMemoryError::AdapterError {
        error: format!("{operation} unavailable"),
    }
}

#[async_trait]
impl KeyValueRead for BrokenClaimContext {
    type AdapterError = InMemoryError;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::AdapterError> {
        self.inner.get(key).await
    }
}

#[async_trait]
impl KeyValueStore for BrokenClaimContext {
    type AdapterError = InMemoryError;

    async fn set_if_absent(&self, key: &str, value: String) -> Result<bool, Self::AdapterError> {
        if key.starts_with("duplicate:") {
            return Err(backend_down("claim"));
        }
        self.inner.set_if_absent(key, value).await
    }
}

#[async_trait]
impl KeyValueDelete for BrokenClaimContext {
    type AdapterError = InMemoryError;

    async fn remove(&self, key: &str) -> Result<(), Self::AdapterError> {
        if self.fail_remove {
            return Err(backend_down("remove"));
        }
        self.inner.remove(key).await
    }
}

fn item(short_description: &str, price: &str) -> Item {
    Item {
        short_description: short_description.to_owned(),
        price: price.parse().unwrap(),
    }
}

#[fixture]
fn storage() -> KeyValueStorage {
    Arc::new(RwLock::new(HashMap::new()))
}

#[fixture]
fn context(storage: KeyValueStorage) -> InMemoryContext {
    InMemoryContext::new(storage)
}

#[fixture]
fn receipt() -> Receipt {
    Receipt {
        retailer: "Target".to_owned(),
        purchase_date: "2022-01-01".parse().unwrap(),
        purchase_time: "13:01:00".parse().unwrap(),
        items: vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
            item("Knorr Creamy Chicken", "1.26"),
            item("Doritos Nacho Cheese", "3.35"),
            item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
        total: "35.35".parse().unwrap(),
    }
}

#[rstest]
#[tokio::test]
async fn points_are_stable_after_creation(context: InMemoryContext, receipt: Receipt) {
    let manager = Manager::new(context);

    let id = manager.create_receipt(receipt).await.unwrap();

    for _ in 0..3 {
        assert_eq!(manager.get_points(&id).await.unwrap(), 28);
    }
}

#[rstest]
#[tokio::test]
async fn stored_receipt_is_retrievable(context: InMemoryContext, receipt: Receipt) {
    let manager = Manager::new(context);

    let id = manager.create_receipt(receipt.clone()).await.unwrap();
    let stored = manager.get_receipt(&id).await.unwrap();

    assert_eq!(stored.id, id);
    assert_eq!(stored.points, 28);
    assert_eq!(stored.receipt, receipt);
}

#[rstest]
#[tokio::test]
async fn client_supplied_points_are_overwritten(context: InMemoryContext) {
    let manager = Manager::new(context);
    let body = serde_json::json!({
        "id": "chosen-by-client",
        "points": "1000",
        "retailer": "M&M Corner Market",
        "purchaseDate": "2022-03-20",
        "purchaseTime": "14:33",
        "items": [
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" }
        ],
        "total": "9.00"
    });

    let receipt = Receipt::from_json(body.to_string().as_bytes()).unwrap();
    let id = manager.create_receipt(receipt).await.unwrap();

    assert_ne!(id, "chosen-by-client");
    assert_eq!(manager.get_points(&id).await.unwrap(), 109);
    assert!(manager.get_points("chosen-by-client").await.is_err());
}

#[rstest]
#[tokio::test]
async fn duplicate_receipt_is_rejected(
    context: InMemoryContext,
    receipt: Receipt,
) {
    let manager = Manager::new(context);
    manager.create_receipt(receipt.clone()).await.unwrap();
    let stored_keys = manager.context().len().unwrap();

    // Same retailer (modulo whitespace), date, time and total, different items
    let mut duplicate = receipt;
    duplicate.retailer = format!("  {}  ", duplicate.retailer);
    duplicate.items.truncate(1);

    assert!(matches!(
        manager.create_receipt(duplicate).await,
        Err(Error::DuplicateReceipt)
    ));
    assert_eq!(manager.context().len().unwrap(), stored_keys);
}

#[rstest]
#[tokio::test]
async fn receipts_differing_in_total_are_not_duplicates(
    context: InMemoryContext,
    receipt: Receipt,
) {
    let manager = Manager::new(context);
    let mut other = receipt.clone();
    other.total = "35.36".parse().unwrap();

    let first = manager.create_receipt(receipt).await.unwrap();
    let second = manager.create_receipt(other).await.unwrap();

    assert_ne!(first, second);
}

#[rstest]
#[tokio::test]
async fn unknown_id_is_not_found(context: InMemoryContext) {
    let manager = Manager::new(context);

    assert!(matches!(
        manager.get_points("4b3f6f8e-0000-4000-8000-000000000000").await,
        Err(Error::NotFound { .. })
    ));
}

#[rstest]
#[tokio::test]
async fn negative_total_is_rejected(context: InMemoryContext, mut receipt: Receipt) {
    let manager = Manager::new(context);
    receipt.total = "-35.35".parse().unwrap();

    assert!(matches!(
        manager.create_receipt(receipt).await,
        Err(Error::Validation { .. })
    ));
    assert!(manager.context().is_empty().unwrap());
}

#[rstest]
#[tokio::test]
async fn identifier_collision_is_retried(context: InMemoryContext, receipt: Receipt) {
    context
        .set_if_absent("receipt:taken", "{}".to_owned())
        .await
        .unwrap();
    let manager = Manager::new(context).with_id_generator(Sequence::new(&["taken", "fresh"]));

    let id = manager.create_receipt(receipt).await.unwrap();

    assert_eq!(id, "fresh");
    assert_eq!(manager.get_points("fresh").await.unwrap(), 28);
}

#[rstest]
#[tokio::test]
async fn exhausted_identifiers_leave_no_partial_write(
    context: InMemoryContext,
    receipt: Receipt,
) {
    context
        .set_if_absent("receipt:taken", "{}".to_owned())
        .await
        .unwrap();
    let manager = Manager::new(context).with_id_generator(Fixed("taken"));

    let result = manager.create_receipt(receipt.clone()).await;

    assert!(matches!(
        result,
        Err(Error::IdentifierExhausted { attempts }) if attempts == MAX_ID_ATTEMPTS
    ));
    // Only the pre-existing record remains, and the receipt is not marked as seen.
    assert_eq!(manager.context().len().unwrap(), 1);
    let manager = manager.with_id_generator(Fixed("free"));
    assert_eq!(manager.create_receipt(receipt).await.unwrap(), "free");
}

#[rstest]
#[tokio::test]
async fn undecodable_record_is_corrupt(context: InMemoryContext) {
    context
        .set_if_absent("receipt:broken", "not a receipt".to_owned())
        .await
        .unwrap();
    let manager = Manager::new(context);

    assert!(matches!(
        manager.get_points("broken").await,
        Err(Error::CorruptRecord { id, .. }) if id == "broken"
    ));
}

#[rstest]
#[tokio::test]
async fn lost_duplicate_race_rolls_back_record(
    context: InMemoryContext,
    receipt: Receipt,
) {
    let manager = Manager::new(RacingContext(context));
    let winner = manager.create_receipt(receipt.clone()).await.unwrap();
    let stored_keys = manager.context().0.len().unwrap();

    assert!(matches!(
        manager.create_receipt(receipt).await,
        Err(Error::DuplicateReceipt)
    ));
    assert_eq!(manager.context().0.len().unwrap(), stored_keys);
    assert_eq!(manager.get_points(&winner).await.unwrap(), 28);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_store_once(
    context: InMemoryContext,
    receipt: Receipt,
) {
    let manager = Arc::new(Manager::new(context));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let manager = manager.clone();
            let receipt = receipt.clone();
            tokio::spawn(async move { manager.create_receipt(receipt).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(Error::DuplicateReceipt) => {}
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(created, 1);
    // One record plus its duplicate index entry
    assert_eq!(manager.context().len().unwrap(), 2);
}

#[rstest]
#[case::rollback_succeeds(false, 0)]
#[case::rollback_fails(true, 1)]
#[tokio::test]
async fn failed_duplicate_claim_reports_backend_error(
    context: InMemoryContext,
    receipt: Receipt,
    #[case] fail_remove: bool,
    #[case] remaining_keys: usize,
) {
    let manager = Manager::new(BrokenClaimContext {
        inner: context,
        fail_remove,
    });

    let result = manager.create_receipt(receipt).await;

    // The claim failure is reported even when the rollback fails too.
    match result {
        Err(Error::AdapterError { source_error }) => {
            assert!(source_error.to_string().contains("claim unavailable"));
        }
        other => panic!("expected adapter error, got {other:?}"),
    }
    assert_eq!(manager.context().inner.len().unwrap(), remaining_keys);
}
