//! Property-Based Tests for the Product Service
//!
//! Random sequences of reads and writes are replayed against the service
//! and a BTreeMap model; every read must match the model, so a cached page
//! that survived a mutation would be caught.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use crate::cache::MemoryCache;
use crate::error::InventoryError;
use crate::models::{JsonPayload, PageRequest, Product, ProductFields, ProductPatch};
use crate::service::ProductService;
use crate::sku::is_valid_sku;
use crate::store::SqliteProductStore;

// == Strategies ==
#[derive(Debug, Clone)]
enum Op {
    Create { name: String, quantity: i64, cents: u32 },
    Replace { pick: usize, quantity: i64 },
    Patch { pick: usize, quantity: i64 },
    Delete { pick: usize },
    ReadAll,
    ReadPage { quantity: i64, page: i64, per_page: i64 },
    ReadOne { pick: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[A-Z][a-z]{2,8}", 0i64..20, 0u32..10_000)
            .prop_map(|(name, quantity, cents)| Op::Create { name, quantity, cents }),
        (any::<usize>(), 0i64..20).prop_map(|(pick, quantity)| Op::Replace { pick, quantity }),
        (any::<usize>(), 0i64..20).prop_map(|(pick, quantity)| Op::Patch { pick, quantity }),
        any::<usize>().prop_map(|pick| Op::Delete { pick }),
        Just(Op::ReadAll),
        (0i64..20, 1i64..4, 1i64..4)
            .prop_map(|(quantity, page, per_page)| Op::ReadPage { quantity, page, per_page }),
        any::<usize>().prop_map(|pick| Op::ReadOne { pick }),
    ]
}

fn fields(name: &str, quantity: i64, price: f64) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        description: format!("{} for testing", name),
        brand: "Acme".to_string(),
        department: "Tools".to_string(),
        quantity,
        price,
    }
}

fn decode_list(payload: &JsonPayload) -> Vec<Product> {
    let value: serde_json::Value = serde_json::from_str(payload.as_str()).unwrap();
    serde_json::from_value(value["Products"].clone()).unwrap()
}

fn decode_one(payload: &JsonPayload) -> Product {
    let value: serde_json::Value = serde_json::from_str(payload.as_str()).unwrap();
    serde_json::from_value(value["Product"].clone()).unwrap()
}

/// SKU at `pick` modulo the model size, or None if the model is empty.
fn pick_sku(model: &BTreeMap<String, Product>, pick: usize) -> Option<String> {
    if model.is_empty() {
        return None;
    }
    model.keys().nth(pick % model.len()).cloned()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // *For any* sequence of operations, every read returns exactly what the
    // store holds after the preceding writes; no pre-mutation data survives.
    #[test]
    fn prop_reads_never_serve_stale_data(ops in prop::collection::vec(op_strategy(), 1..40)) {
        tokio_test::block_on(async {
            let store = Arc::new(SqliteProductStore::in_memory().await.unwrap());
            let service = ProductService::new(store, Arc::new(MemoryCache::new()));
            let mut model: BTreeMap<String, Product> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Create { name, quantity, cents } => {
                        let created = service
                            .create(fields(&name, quantity, f64::from(cents) / 100.0))
                            .await
                            .unwrap();
                        assert!(is_valid_sku(&created.sku));
                        assert!(!model.contains_key(&created.sku), "duplicate SKU issued");
                        model.insert(created.sku.clone(), created);
                    }
                    Op::Replace { pick, quantity } => {
                        let Some(sku) = pick_sku(&model, pick) else { continue };
                        let updated = service
                            .replace(&sku, fields("Replaced", quantity, 1.5))
                            .await
                            .unwrap();
                        model.insert(sku, updated);
                    }
                    Op::Patch { pick, quantity } => {
                        let Some(sku) = pick_sku(&model, pick) else { continue };
                        let patch = ProductPatch { quantity: Some(quantity), ..Default::default() };
                        let updated = service.patch(&sku, patch).await.unwrap();
                        assert_eq!(updated.name, model[&sku].name);
                        model.insert(sku, updated);
                    }
                    Op::Delete { pick } => {
                        let Some(sku) = pick_sku(&model, pick) else { continue };
                        service.delete(&sku).await.unwrap();
                        model.remove(&sku);
                        assert!(matches!(
                            service.delete(&sku).await,
                            Err(InventoryError::NotFound(_))
                        ));
                    }
                    Op::ReadAll => {
                        let expected: Vec<Product> = model.values().cloned().collect();
                        assert_eq!(decode_list(&service.list_all().await.unwrap()), expected);
                    }
                    Op::ReadPage { quantity, page, per_page } => {
                        let request = PageRequest { quantity, page, per_page };
                        let expected: Vec<Product> = model
                            .values()
                            .filter(|p| p.quantity >= quantity)
                            .skip(request.offset() as usize)
                            .take(per_page as usize)
                            .cloned()
                            .collect();
                        let actual = decode_list(&service.list_by_quantity(request).await.unwrap());
                        assert_eq!(actual, expected);
                    }
                    Op::ReadOne { pick } => {
                        let Some(sku) = pick_sku(&model, pick) else { continue };
                        assert_eq!(decode_one(&service.get(&sku).await.unwrap()), model[&sku]);
                    }
                }
            }
        });
    }
}
