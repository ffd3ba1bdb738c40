// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::json;

use crate::{
    field::FieldSpec as F, relation::RelationDescriptor as R, schema::CollectionSchema,
};

/// The e-commerce collections served by the gateway.
pub fn ecommerce_schemas() -> Vec<CollectionSchema> {
    vec![
        users(),
        categories(),
        subcategories(),
        stores(),
        products(),
        carts(),
        cart_items(),
        addresses(),
        orders(),
        customers(),
        notifications(),
    ]
}

fn users() -> CollectionSchema {
    CollectionSchema::new("users")
        .with_field(F::text("email").required().unique())
        .with_field(F::bool("emailVisibility"))
        .with_field(F::text("username").required().unique())
        .with_field(F::text("name"))
        .with_field(F::text("avatar"))
        .with_field(F::bool("verified"))
        .with_default_sort("-created")
        .with_relation(R::reverse("stores", "stores", "user", "id"))
        .with_relation(R::reverse("addresses", "addresses", "user", "id"))
}

fn categories() -> CollectionSchema {
    CollectionSchema::new("categories")
        .with_field(F::text("name").required().unique())
        .with_field(F::text("slug").required().unique())
        .with_field(F::text("description"))
        .with_field(F::text("image"))
        .with_default_sort("name")
        .with_relation(R::reverse(
            "subcategories",
            "subcategories",
            "category",
            "id",
        ))
        .with_relation(R::reverse("products", "products", "category", "id"))
}

fn subcategories() -> CollectionSchema {
    CollectionSchema::new("subcategories")
        .with_field(F::text("name").required())
        .with_field(F::text("slug").required())
        .with_field(F::text("description"))
        .with_field(F::relation("category", "categories").required())
        .with_default_sort("name")
        .with_relation(R::forward("category", "categories"))
        .with_relation(R::reverse("products", "products", "subcategory", "id"))
}

fn stores() -> CollectionSchema {
    CollectionSchema::new("stores")
        .with_field(F::text("name").required())
        .with_field(F::text("slug").required().unique())
        .with_field(F::text("description"))
        .with_field(F::relation("user", "users").required())
        .with_field(F::text("plan").with_default(json!("free")))
        .with_field(F::datetime("plan_ends_at").nullable())
        .with_field(F::bool("cancel_plan_at_end"))
        .with_field(F::int("product_limit").with_default(json!(10)))
        .with_field(F::int("tag_limit").with_default(json!(5)))
        .with_field(F::int("variant_limit").with_default(json!(5)))
        .with_field(F::bool("active").with_default(json!(true)))
        .with_default_sort("-created")
        .with_activeness_field("active")
        .with_relation(R::forward("user", "users"))
        .with_relation(R::reverse("products", "products", "store", "id"))
        .with_relation(R::reverse("orders", "orders", "store", "id"))
        .with_relation(R::reverse("customers", "customers", "store", "id"))
}

fn products() -> CollectionSchema {
    CollectionSchema::new("products")
        .with_field(F::text("name").required())
        .with_field(F::text("description"))
        .with_field(F::json("images").with_default(json!([])))
        .with_field(F::relation("category", "categories").required())
        .with_field(F::relation("subcategory", "subcategories"))
        .with_field(F::text("price").required())
        .with_field(F::int("inventory"))
        .with_field(F::float("rating"))
        .with_field(F::relation("store", "stores").required())
        .with_field(F::bool("active").with_default(json!(true)))
        .with_default_sort("-created")
        .with_activeness_field("active")
        .with_relation(R::forward("category", "categories"))
        .with_relation(R::forward("subcategory", "subcategories"))
        .with_relation(R::forward("store", "stores"))
}

fn carts() -> CollectionSchema {
    CollectionSchema::new("carts")
        .with_field(F::relation("user", "users"))
        .with_field(F::text("session_id"))
        .with_default_sort("-created")
        .with_relation(R::forward("user", "users"))
        .with_relation(R::reverse("cart_items", "cart_items", "cart", "id"))
}

fn cart_items() -> CollectionSchema {
    CollectionSchema::new("cart_items")
        .with_field(F::relation("cart", "carts").required())
        .with_field(F::relation("product", "products").required())
        .with_field(F::int("quantity").required().with_min(1))
        .with_field(F::relation("subcategory", "subcategories"))
        .with_default_sort("-created")
        .with_merge_rule(&["cart", "product"], "quantity")
        .with_relation(R::forward("product", "products"))
        .with_relation(R::forward("cart", "carts"))
        .with_relation(R::forward("subcategory", "subcategories"))
}

fn addresses() -> CollectionSchema {
    CollectionSchema::new("addresses")
        .with_field(F::text("line1").required())
        .with_field(F::text("line2"))
        .with_field(F::text("city").required())
        .with_field(F::text("state").required())
        .with_field(F::text("postal_code").required())
        .with_field(F::text("country").required())
        .with_field(F::relation("user", "users").required())
        .with_default_sort("-created")
        .with_relation(R::forward("user", "users"))
        .with_relation(R::reverse("orders", "orders", "address", "id"))
}

fn orders() -> CollectionSchema {
    CollectionSchema::new("orders")
        .with_field(F::relation("user", "users"))
        .with_field(F::relation("store", "stores").required())
        .with_field(F::json("items").required())
        .with_field(F::int("quantity"))
        .with_field(F::text("amount").required())
        .with_field(F::text("status").with_default(json!("pending")))
        .with_field(F::text("name").required())
        .with_field(F::text("email").required())
        .with_field(F::relation("address", "addresses").required())
        .with_field(F::text("notes"))
        .with_default_sort("-created")
        .with_relation(R::forward("user", "users"))
        .with_relation(R::forward("store", "stores"))
        .with_relation(R::forward("address", "addresses"))
}

fn customers() -> CollectionSchema {
    CollectionSchema::new("customers")
        .with_field(F::text("name"))
        .with_field(F::text("email").required())
        .with_field(F::relation("store", "stores").required())
        .with_field(F::int("total_orders"))
        .with_field(F::text("total_spent").with_default(json!("0")))
        .with_default_sort("-created")
        .with_relation(R::forward("store", "stores"))
        .with_relation(R::reverse("orders", "orders", "email", "email"))
}

fn notifications() -> CollectionSchema {
    CollectionSchema::new("notifications")
        .with_field(F::text("email").required().unique())
        .with_field(F::text("token").required().unique())
        .with_field(F::relation("user", "users"))
        .with_field(F::bool("communication"))
        .with_field(F::bool("newsletter"))
        .with_field(F::bool("marketing"))
        .with_default_sort("-created")
        .with_relation(R::forward("user", "users"))
}
