// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{
    App, HttpServer,
    middleware::{self, TrailingSlash},
    web,
};
use collection_model::{ModelError, SchemaRegistry, ecommerce_schemas};
use collection_resolver::CollectionDispatcher;
use common::{
    cors::CorsConfig,
    env_const::{
        GATE_CORS_DOMAINS, GATE_CREATE_SCHEMA, get_api_http_path, get_server_host,
        get_server_port,
    },
    logging_tracing,
};
use gate_env::{EnvError, Environment, SystemEnvironment};
use gate_sql::{DatabaseClientManager, database_error::DatabaseError};
use server_actix::{configure_router, cors_headers};
use thiserror::Error;
use tracing::info;
use tracing_actix_web::TracingLogger;

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time;

#[derive(Error)]
enum ServerError {
    #[error("Port {0} is already in use. Check if there is another process running at that port.")]
    PortInUse(u16),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Env(#[from] EnvError),
    #[error("{0}")]
    Database(#[from] DatabaseError),
    #[error("{0}")]
    Model(#[from] ModelError),
}

// A custom `Debug` implementation for `ServerError` (that delegate to the `Display` impl), so that
// we don't print the default `Debug` implementation's message when the server exits.
impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    let start_time = time::SystemTime::now();

    logging_tracing::init();

    let env = SystemEnvironment;

    let registry = SchemaRegistry::new(ecommerce_schemas())?;
    let clients = DatabaseClientManager::from_env(&env).await?;

    if env.enabled(GATE_CREATE_SCHEMA, false)? {
        let client = clients.get_client().await?;
        client
            .batch_execute(&registry.creation_sql())
            .await
            .map_err(DatabaseError::Delegate)?;
        info!("Created missing collection tables");
    }

    let dispatcher = web::Data::new(CollectionDispatcher::new(
        Arc::new(registry),
        Arc::new(clients),
    ));
    let cors_config = web::Data::new(CorsConfig::from_env(env.get(GATE_CORS_DOMAINS)));

    let server_host = get_server_host(&env);
    let server_port = get_server_port(&env)?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::from_fn(cors_headers))
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::new(TrailingSlash::Trim))
            .configure(configure_router(
                dispatcher.clone(),
                cors_config.clone(),
                &SystemEnvironment,
            ))
    });

    match server.bind((server_host.as_str(), server_port)) {
        Ok(server) => {
            let pretty_addr = pretty_addr(&server.addrs());
            let elapsed = start_time
                .elapsed()
                .map(|elapsed| elapsed.as_micros() as f64 / 1000.0)
                .unwrap_or_default();

            info!("Started server on {pretty_addr} in {elapsed:.2} ms");
            println!("Started server on {pretty_addr} in {elapsed:.2} ms");
            println!("- Collections API hosted at:");
            println!("\thttp://{pretty_addr}{}", get_api_http_path(&env));

            Ok(server.run().await?)
        }
        Err(e) => Err(if e.kind() == ErrorKind::AddrInUse {
            ServerError::PortInUse(server_port)
        } else {
            ServerError::Io(e)
        }),
    }
}

fn pretty_addr(addrs: &[SocketAddr]) -> String {
    let loopback_addr = addrs.iter().find(|addr| addr.ip().is_loopback());

    match loopback_addr {
        Some(addr) => format!("localhost:{}", addr.port()),
        None => match addrs {
            // Print single address without square brackets
            [addr] => format!("{addr}"),
            _ => {
                format!("{addrs:?}")
            }
        },
    }
}
