// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::{Method, header};

use super::CorsAllowOrigin;

const ALLOW_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allow_origin: CorsAllowOrigin,
    pub max_age_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsResponse<'a> {
    Allow(&'a str), // Allow and add CORS headers with the given origin
    NoCorsHeaders,  // Allow but do not add CORS headers
    Deny,           // Deny (and do not add CORS headers)
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: CorsAllowOrigin::None,
            max_age_seconds: None,
        }
    }
}

impl CorsConfig {
    /// Create a CorsConfig from a list of domains
    ///
    /// The domains list is a comma-separated list of domains, with special values:
    /// - `*` means all origins are allowed.
    /// - `""` (empty string) means no origins are allowed.
    pub fn from_env(domains_list: Option<String>) -> Self {
        let allow_origin = match domains_list {
            Some(domains) => match domains.trim() {
                "*" => CorsAllowOrigin::All,
                "" => CorsAllowOrigin::None,
                _ => CorsAllowOrigin::Specific(
                    domains
                        .split(',')
                        .map(|domain| domain.trim().to_string())
                        .filter(|domain| !domain.is_empty())
                        .collect(),
                ),
            },
            None => CorsAllowOrigin::None,
        };

        Self {
            allow_origin,
            max_age_seconds: Some(3600),
        }
    }

    /// Determine the CORS response for a given origin and method.
    ///
    /// Requests without an `Origin` header are not CORS requests and pass through without CORS
    /// headers. A non-matching origin is denied only for preflight (`OPTIONS`) requests; other
    /// methods proceed without CORS headers and the browser enforces the policy.
    pub fn allow_origin<'a>(&self, origin: Option<&'a str>, method: &Method) -> CorsResponse<'a> {
        let deny_response = || match method {
            &Method::OPTIONS => CorsResponse::Deny,
            _ => CorsResponse::NoCorsHeaders,
        };

        match origin {
            Some(origin) => match &self.allow_origin {
                CorsAllowOrigin::All => CorsResponse::Allow(origin),
                CorsAllowOrigin::Specific(allowed_origins) => {
                    if allowed_origins.contains(origin) {
                        CorsResponse::Allow(origin)
                    } else {
                        deny_response()
                    }
                }
                CorsAllowOrigin::None => deny_response(),
            },
            None => match method {
                &Method::OPTIONS => CorsResponse::Deny,
                _ => CorsResponse::NoCorsHeaders,
            },
        }
    }

    /// Response headers to add for an allowed origin.
    pub fn headers(&self, origin: &str) -> Vec<(String, String)> {
        let mut headers = vec![
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN.to_string(),
                origin.to_string(),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS.to_string(),
                ALLOW_METHODS.to_string(),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS.to_string(),
                ALLOW_HEADERS.to_string(),
            ),
        ];
        if let Some(max_age_seconds) = self.max_age_seconds {
            headers.push((
                header::ACCESS_CONTROL_MAX_AGE.to_string(),
                max_age_seconds.to_string(),
            ));
        }
        // Only the origin influences the response
        headers.push((header::VARY.to_string(), "Origin".to_string()));

        headers
    }
}
