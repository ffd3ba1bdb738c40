// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gate_env::{EnvError, Environment};

pub const GATE_POSTGRES_URL: &str = "GATE_POSTGRES_URL";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const GATE_POSTGRES_USER: &str = "GATE_POSTGRES_USER";
pub const GATE_POSTGRES_PASSWORD: &str = "GATE_POSTGRES_PASSWORD";
pub const GATE_CONNECTION_POOL_SIZE: &str = "GATE_CONNECTION_POOL_SIZE";
pub const GATE_CHECK_CONNECTION_ON_STARTUP: &str = "GATE_CHECK_CONNECTION_ON_STARTUP";
pub const GATE_CREATE_SCHEMA: &str = "GATE_CREATE_SCHEMA";

pub const GATE_SERVER_HOST: &str = "GATE_SERVER_HOST";
pub const GATE_SERVER_PORT: &str = "GATE_SERVER_PORT";
pub const GATE_API_HTTP_PATH: &str = "GATE_API_HTTP_PATH";

pub const GATE_CORS_DOMAINS: &str = "GATE_CORS_DOMAINS";

pub const DEFAULT_CONNECTION_POOL_SIZE: usize = 10;
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 9000;
pub const DEFAULT_API_HTTP_PATH: &str = "/api";

/// The prefix under which the collection API is mounted, normalized to a leading slash and no
/// trailing slash.
pub fn get_api_http_path(env: &impl Environment) -> String {
    let path = env.get_or_else(GATE_API_HTTP_PATH, DEFAULT_API_HTTP_PATH);
    let trimmed = path.trim().trim_matches('/');

    format!("/{trimmed}")
}

pub fn get_server_port(env: &impl Environment) -> Result<u16, EnvError> {
    Ok(env
        .get_parsed(GATE_SERVER_PORT)?
        .unwrap_or(DEFAULT_SERVER_PORT))
}

pub fn get_server_host(env: &impl Environment) -> String {
    env.get(GATE_SERVER_HOST)
        .filter(|host| !host.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string())
}

#[cfg(test)]
mod tests {
    use gate_env::MapEnvironment;

    use super::*;

    #[test]
    fn api_path_normalization() {
        for (value, expected) in [("/api", "/api"), ("api/", "/api"), ("/v1/shop/", "/v1/shop")] {
            let env = MapEnvironment::from([(GATE_API_HTTP_PATH, value)]);
            assert_eq!(get_api_http_path(&env), expected);
        }

        assert_eq!(get_api_http_path(&MapEnvironment::new()), "/api");
    }

    #[test]
    fn server_defaults() {
        let env = MapEnvironment::new();

        assert_eq!(get_server_port(&env).unwrap(), 9000);
        assert_eq!(get_server_host(&env), "0.0.0.0");
    }

    #[test]
    fn invalid_port() {
        let env = MapEnvironment::from([(GATE_SERVER_PORT, "http")]);

        assert!(get_server_port(&env).is_err());
    }
}
