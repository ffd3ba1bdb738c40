// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! End-to-end repository tests against a live PostgreSQL server.
//!
//! Run with `GATE_TEST_POSTGRES_URL=postgres://... cargo test --features postgres-tests`.

#![cfg(feature = "postgres-tests")]

use std::{
    panic::AssertUnwindSafe,
    sync::{Arc, Mutex},
};

use chrono::DateTime;
use futures::FutureExt;
use collection_model::{SchemaRegistry, ecommerce_schemas};
use collection_resolver::{CollectionDispatcher, CollectionError, ListQuery, Record};
use gate_sql::testing::with_isolated_schema;
use serde_json::{Map, Value, json};
use test_log::test;

const GATE_TEST_POSTGRES_URL: &str = "GATE_TEST_POSTGRES_URL";

async fn with_dispatcher<F, Fut>(test: F)
where
    F: FnOnce(CollectionDispatcher) -> Fut,
    Fut: Future<Output = ()>,
{
    let url = std::env::var(GATE_TEST_POSTGRES_URL)
        .expect("GATE_TEST_POSTGRES_URL must be set to run postgres tests");
    let registry = SchemaRegistry::new(ecommerce_schemas()).unwrap();
    let creation_sql = registry.creation_sql();

    with_isolated_schema(&url, &creation_sql, |clients| async move {
        test(CollectionDispatcher::new(Arc::new(registry), Arc::new(clients))).await
    })
    .await
    .unwrap();
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

async fn create(dispatcher: &CollectionDispatcher, collection: &str, payload: Value) -> Record {
    dispatcher
        .dispatch(collection)
        .unwrap()
        .create(&object(payload))
        .await
        .unwrap()
}

fn text<'a>(record: &'a Record, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap()
}

fn list_query(filter: Option<&str>, sort: Option<&str>, expand: Option<&str>) -> ListQuery {
    ListQuery {
        filter: filter.map(str::to_string),
        sort: sort.map(str::to_string),
        expand: expand.map(str::to_string),
        ..Default::default()
    }
}

/// A user owning one store, plus a category, returned as (store id, category id).
async fn store_and_category(dispatcher: &CollectionDispatcher) -> (String, String) {
    let user = create(
        dispatcher,
        "users",
        json!({"email": "ann@example.com", "username": "ann"}),
    )
    .await;
    let store = create(
        dispatcher,
        "stores",
        json!({"name": "Ann's", "slug": "anns", "user": user.id()}),
    )
    .await;
    let category = create(
        dispatcher,
        "categories",
        json!({"name": "Footwear", "slug": "footwear"}),
    )
    .await;

    (
        store.id().unwrap().to_string(),
        category.id().unwrap().to_string(),
    )
}

#[test(tokio::test)]
async fn create_then_get() {
    with_dispatcher(|dispatcher| async move {
        let created = create(
            &dispatcher,
            "categories",
            json!({"name": "Bags", "slug": "bags", "id": "forged", "extra": 1}),
        )
        .await;

        let id = created.id().unwrap();
        assert_eq!(id.len(), 15);
        assert_ne!(id, "forged");
        assert_eq!(text(&created, "collectionName"), "categories");
        assert_eq!(text(&created, "collectionId"), "categories");
        assert_eq!(text(&created, "description"), "");
        assert!(created.get("extra").is_none());

        let created_at = DateTime::parse_from_rfc3339(text(&created, "created")).unwrap();
        let updated_at = DateTime::parse_from_rfc3339(text(&created, "updated")).unwrap();
        assert!(updated_at >= created_at);

        let fetched = dispatcher
            .dispatch("categories")
            .unwrap()
            .get(id, None)
            .await
            .unwrap();
        assert_eq!(fetched, created);
    })
    .await;
}

#[test(tokio::test)]
async fn update_and_delete() {
    with_dispatcher(|dispatcher| async move {
        let categories = dispatcher.dispatch("categories").unwrap();
        let created = create(&dispatcher, "categories", json!({"name": "Bags", "slug": "bags"})).await;
        let id = created.id().unwrap();

        let updated = categories
            .update(id, &object(json!({"description": "Carry things", "slug": 5})))
            .await
            .unwrap();
        assert_eq!(text(&updated, "description"), "Carry things");
        assert_eq!(text(&updated, "slug"), "bags");
        assert_eq!(text(&updated, "created"), text(&created, "created"));
        assert!(
            DateTime::parse_from_rfc3339(text(&updated, "updated")).unwrap()
                >= DateTime::parse_from_rfc3339(text(&created, "updated")).unwrap()
        );

        assert!(matches!(
            categories.update(id, &Map::new()).await,
            Err(CollectionError::NothingToUpdate)
        ));
        assert!(matches!(
            categories
                .update("missing", &object(json!({"name": "x"})))
                .await,
            Err(CollectionError::RecordNotFound)
        ));

        categories.delete(id).await.unwrap();
        assert!(matches!(
            categories.delete(id).await,
            Err(CollectionError::RecordNotFound)
        ));
        assert!(matches!(
            categories.get(id, None).await,
            Err(CollectionError::RecordNotFound)
        ));
    })
    .await;
}

#[test(tokio::test)]
async fn pagination() {
    with_dispatcher(|dispatcher| async move {
        for name in ["e", "c", "a", "d", "b"] {
            create(&dispatcher, "categories", json!({"name": name, "slug": name})).await;
        }
        let categories = dispatcher.dispatch("categories").unwrap();

        let query = ListQuery {
            per_page: Some("2".into()),
            ..Default::default()
        };
        let first = categories.list(&query).await.unwrap();
        assert_eq!(first.total_items, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.per_page, 2);
        // Default sort for categories is by name
        let names: Vec<_> = first.items.iter().map(|r| text(r, "name")).collect();
        assert_eq!(names, vec!["a", "b"]);

        let query = ListQuery {
            page: Some("3".into()),
            per_page: Some("2".into()),
            sort: Some("-name".into()),
            ..Default::default()
        };
        let last = categories.list(&query).await.unwrap();
        assert_eq!(last.page, 3);
        assert_eq!(last.items.len(), 1);
        assert_eq!(text(&last.items[0], "name"), "a");

        let query = ListQuery {
            per_page: Some("500".into()),
            ..Default::default()
        };
        assert_eq!(categories.list(&query).await.unwrap().per_page, 30);
    })
    .await;
}

#[test(tokio::test)]
async fn filters_are_exact_and_respect_activeness() {
    with_dispatcher(|dispatcher| async move {
        let (store, category) = store_and_category(&dispatcher).await;
        for (name, active) in [("Shoes", true), ("shoes", true), ("Shoes", false)] {
            create(
                &dispatcher,
                "products",
                json!({
                    "name": name,
                    "price": "10",
                    "store": store,
                    "category": category,
                    "active": active
                }),
            )
            .await;
        }
        let products = dispatcher.dispatch("products").unwrap();

        let page = products
            .list(&list_query(Some(r#"name = "Shoes""#), None, None))
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(text(&page.items[0], "name"), "Shoes");

        let page = products
            .list(&list_query(Some(r#"name = "Shoes" && active = false"#), None, None))
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].get("active"), Some(&json!(false)));

        let page = products.list(&ListQuery::default()).await.unwrap();
        assert_eq!(page.total_items, 2);

        assert!(matches!(
            products
                .list(&list_query(Some(r#"colour = "red""#), None, None))
                .await,
            Err(CollectionError::Validation(_))
        ));
    })
    .await;
}

#[test(tokio::test)]
async fn cart_items_merge_on_cart_and_product() {
    with_dispatcher(|dispatcher| async move {
        let (store, category) = store_and_category(&dispatcher).await;
        let product = create(
            &dispatcher,
            "products",
            json!({"name": "Shoes", "price": "10", "store": store, "category": category}),
        )
        .await;
        let cart = create(&dispatcher, "carts", json!({"session_id": "guest-1"})).await;

        let item = json!({"cart": cart.id(), "product": product.id(), "quantity": 2});
        let first = create(&dispatcher, "cart_items", item).await;

        let item = json!({"cart": cart.id(), "product": product.id(), "quantity": 3});
        let merged = create(&dispatcher, "cart_items", item).await;

        assert_eq!(merged.id(), first.id());
        assert_eq!(merged.get("quantity"), Some(&json!(5)));
        assert_eq!(text(&merged, "subcategory"), "");

        // A negative quantity cannot shrink the merged row
        let item = object(json!({"cart": cart.id(), "product": product.id(), "quantity": -7}));
        assert!(matches!(
            dispatcher.dispatch("cart_items").unwrap().create(&item).await,
            Err(CollectionError::Validation(_))
        ));

        let page = dispatcher
            .dispatch("cart_items")
            .unwrap()
            .list(&ListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
    })
    .await;
}

#[test(tokio::test)]
async fn expansion() {
    with_dispatcher(|dispatcher| async move {
        let (store, category) = store_and_category(&dispatcher).await;
        for (name, active) in [("Shoes", true), ("Boots", false)] {
            create(
                &dispatcher,
                "products",
                json!({
                    "name": name,
                    "price": "10",
                    "store": store,
                    "category": category,
                    "active": active
                }),
            )
            .await;
        }

        let page = dispatcher
            .dispatch("products")
            .unwrap()
            .list(&list_query(None, None, Some("store, subcategory, store, nonsense")))
            .await
            .unwrap();
        let product = &page.items[0];
        assert_eq!(product.expand().len(), 1);
        assert_eq!(product.expand()["store"]["id"], json!(store));
        assert_eq!(product.expand()["store"]["collectionName"], json!("stores"));

        // Reverse relations only list active products
        let stores = dispatcher.dispatch("stores").unwrap();
        let expanded = stores.get(&store, Some("products")).await.unwrap();
        let products = expanded.expand()["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["name"], json!("Shoes"));

        // Reverse relations are always present, even when empty
        let expanded = stores.get(&store, Some("orders")).await.unwrap();
        assert_eq!(expanded.expand()["orders"], json!([]));

        // Unknown relations leave the record untouched
        let plain = stores.get(&store, None).await.unwrap();
        let unknown = stores.get(&store, Some("nonsense")).await.unwrap();
        assert_eq!(unknown, plain);
        assert!(serde_json::to_value(&unknown).unwrap().get("expand").is_none());
    })
    .await;
}

#[test(tokio::test)]
async fn customer_orders_match_on_email() {
    with_dispatcher(|dispatcher| async move {
        let (store, _) = store_and_category(&dispatcher).await;
        let user = create(
            &dispatcher,
            "users",
            json!({"email": "bob@example.com", "username": "bob"}),
        )
        .await;
        let address = create(
            &dispatcher,
            "addresses",
            json!({
                "line1": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "postal_code": "62701",
                "country": "US",
                "user": user.id()
            }),
        )
        .await;
        for email in ["bob@example.com", "eve@example.com"] {
            create(
                &dispatcher,
                "orders",
                json!({
                    "store": store,
                    "items": {"p1": 1},
                    "amount": "10",
                    "name": "Bob",
                    "email": email,
                    "address": address.id()
                }),
            )
            .await;
        }
        let customer = create(
            &dispatcher,
            "customers",
            json!({"email": "bob@example.com", "store": store}),
        )
        .await;

        let expanded = dispatcher
            .dispatch("customers")
            .unwrap()
            .get(customer.id().unwrap(), Some("orders,store"))
            .await
            .unwrap();

        let orders = expanded.expand()["orders"].as_array().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["email"], json!("bob@example.com"));
        assert_eq!(orders[0]["status"], json!("pending"));
        assert_eq!(orders[0]["items"], json!({"p1": 1}));
        assert_eq!(expanded.expand()["store"]["id"], json!(store));
    })
    .await;
}

#[test(tokio::test)]
async fn isolated_schema_is_dropped_after_a_panic() {
    let url = std::env::var(GATE_TEST_POSTGRES_URL)
        .expect("GATE_TEST_POSTGRES_URL must be set to run postgres tests");
    let schema = Arc::new(Mutex::new(None::<String>));

    let seen = schema.clone();
    let failing = with_isolated_schema::<_, _, ()>(&url, "", |clients| async move {
        let client = clients.get_client().await.unwrap();
        let row = client.query_one("SELECT current_schema()", &[]).await.unwrap();
        *seen.lock().unwrap() = row.get(0);
        panic!("failing test body");
    });
    let outcome = AssertUnwindSafe(failing).catch_unwind().await;
    assert!(outcome.is_err());

    let schema = schema.lock().unwrap().clone().unwrap();
    assert!(schema.starts_with("gate_test_"));

    let (admin, connection) = tokio_postgres::connect(&url, tokio_postgres::NoTls)
        .await
        .unwrap();
    tokio::spawn(connection);
    let remaining: i64 = admin
        .query_one(
            "SELECT COUNT(*) FROM information_schema.schemata WHERE schema_name = $1",
            &[&schema],
        )
        .await
        .unwrap()
        .get(0);
    assert_eq!(remaining, 0);
}
