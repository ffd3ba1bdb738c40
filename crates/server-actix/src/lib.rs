// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! HTTP surface of the gateway: PocketBase-style record routes over the collection dispatcher.

mod cors;
mod error;

use actix_web::{
    HttpResponse, guard,
    web::{self, ServiceConfig},
};
use chrono::{SecondsFormat, Utc};
use collection_resolver::{CollectionDispatcher, ListQuery};
use common::{cors::CorsConfig, env_const::get_api_http_path};
use gate_env::Environment;
use serde::Deserialize;
use serde_json::json;

pub use cors::cors_headers;
pub use error::ApiError;

use error::parse_object;

#[derive(Debug, Deserialize)]
struct ExpandQuery {
    expand: Option<String>,
}

pub fn configure_router(
    dispatcher: web::Data<CollectionDispatcher>,
    cors_config: web::Data<CorsConfig>,
    env: &impl Environment,
) -> impl FnOnce(&mut ServiceConfig) {
    let api_path = get_api_http_path(env);

    move |app| {
        let scope_path = api_path.trim_end_matches('/');

        app.app_data(dispatcher)
            .app_data(cors_config)
            .service(
                web::resource("/{tail:.*}")
                    .guard(guard::Options())
                    .to(cors::preflight),
            )
            .service(
                web::scope(scope_path)
                    .route("/health", web::get().to(health))
                    .service(
                        web::resource("/collections/{collection}/records")
                            .route(web::get().to(list_records))
                            .route(web::post().to(create_record)),
                    )
                    .service(
                        web::resource("/collections/{collection}/records/{id}")
                            .route(web::get().to(get_record))
                            .route(web::patch().to(update_record))
                            .route(web::delete().to(delete_record)),
                    ),
            );
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

async fn list_records(
    path: web::Path<String>,
    query: web::Query<ListQuery>,
    dispatcher: web::Data<CollectionDispatcher>,
) -> Result<HttpResponse, ApiError> {
    let repository = dispatcher.dispatch(&path)?;
    let page = repository.list(&query).await?;

    Ok(HttpResponse::Ok().json(page))
}

async fn get_record(
    path: web::Path<(String, String)>,
    query: web::Query<ExpandQuery>,
    dispatcher: web::Data<CollectionDispatcher>,
) -> Result<HttpResponse, ApiError> {
    let (collection, id) = path.into_inner();
    let repository = dispatcher.dispatch(&collection)?;
    let record = repository.get(&id, query.expand.as_deref()).await?;

    Ok(HttpResponse::Ok().json(record))
}

async fn create_record(
    path: web::Path<String>,
    body: web::Bytes,
    dispatcher: web::Data<CollectionDispatcher>,
) -> Result<HttpResponse, ApiError> {
    let repository = dispatcher.dispatch(&path)?;
    let payload = parse_object(&body)?;
    let record = repository.create(&payload).await?;

    Ok(HttpResponse::Ok().json(record))
}

async fn update_record(
    path: web::Path<(String, String)>,
    body: web::Bytes,
    dispatcher: web::Data<CollectionDispatcher>,
) -> Result<HttpResponse, ApiError> {
    let (collection, id) = path.into_inner();
    let repository = dispatcher.dispatch(&collection)?;
    let payload = parse_object(&body)?;
    let record = repository.update(&id, &payload).await?;

    Ok(HttpResponse::Ok().json(record))
}

async fn delete_record(
    path: web::Path<(String, String)>,
    dispatcher: web::Data<CollectionDispatcher>,
) -> Result<HttpResponse, ApiError> {
    let (collection, id) = path.into_inner();
    dispatcher.dispatch(&collection)?.delete(&id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{
        App,
        http::{StatusCode, header},
        middleware::{self, TrailingSlash},
        test,
    };
    use collection_model::{SchemaRegistry, ecommerce_schemas};
    use gate_env::MapEnvironment;
    use gate_sql::DatabaseClientManager;
    use serde_json::Value;

    use super::*;

    async fn dispatcher() -> web::Data<CollectionDispatcher> {
        let registry = SchemaRegistry::new(ecommerce_schemas()).unwrap();
        // Nothing in these tests reaches the database
        let clients = DatabaseClientManager::from_db_url("postgres://localhost:1/shop", 1, false)
            .await
            .unwrap();

        web::Data::new(CollectionDispatcher::new(
            Arc::new(registry),
            Arc::new(clients),
        ))
    }

    macro_rules! app {
        ($env:expr, $cors:expr) => {
            test::init_service(
                App::new()
                    .wrap(middleware::from_fn(cors_headers))
                    .wrap(middleware::NormalizePath::new(TrailingSlash::Trim))
                    .configure(configure_router(
                        dispatcher().await,
                        web::Data::new($cors),
                        &$env,
                    )),
            )
            .await
        };
    }

    fn default_env() -> MapEnvironment {
        MapEnvironment::new()
    }

    #[actix_web::test]
    async fn health() {
        let app = app!(default_env(), CorsConfig::default());

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert!(body["time"].as_str().unwrap().ends_with('Z'));
    }

    #[actix_web::test]
    async fn custom_api_path() {
        let env = MapEnvironment::from([("GATE_API_HTTP_PATH", "/v1/shop/")]);
        let app = app!(env, CorsConfig::default());

        let req = test::TestRequest::get().uri("/v1/shop/health/").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn unknown_collection() {
        let app = app!(default_env(), CorsConfig::default());

        let req = test::TestRequest::get()
            .uri("/api/collections/articles/records")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Collection 'articles' not found"}));
    }

    #[actix_web::test]
    async fn invalid_bodies() {
        let app = app!(default_env(), CorsConfig::default());

        let req = test::TestRequest::post()
            .uri("/api/collections/products/records")
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid JSON data"}));

        let req = test::TestRequest::post()
            .uri("/api/collections/products/records")
            .set_json(json!({"description": "no name"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Field 'name' is required"}));

        let req = test::TestRequest::patch()
            .uri("/api/collections/products/records/abc")
            .set_json(json!({"unknown": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "No valid fields to update"}));
    }

    #[actix_web::test]
    async fn invalid_sort_field() {
        let app = app!(default_env(), CorsConfig::default());

        let req = test::TestRequest::get()
            .uri("/api/collections/products/records?sort=-popularity&page=abc")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn preflight() {
        let cors = CorsConfig::from_env(Some("https://shop.example.com".to_string()));
        let app = app!(default_env(), cors);

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/collections/products/records")
            .insert_header((header::ORIGIN, "https://shop.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://shop.example.com"
        );

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/collections/products/records")
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[actix_web::test]
    async fn cors_headers_on_regular_responses() {
        let app = app!(default_env(), CorsConfig::from_env(Some("*".to_string())));

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "https://shop.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://shop.example.com"
        );
        assert_eq!(resp.headers().get(header::VARY).unwrap(), "Origin");

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
