// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{
    HttpRequest, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{self, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    web,
};
use common::cors::{CorsConfig, CorsResponse};

fn origin(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
}

// Actix uses http-0.2. However, the rest of the system uses
// http-1.x, so we need to convert between the two.
fn to_http_method(method: &actix_web::http::Method) -> Option<http::Method> {
    http::Method::from_bytes(method.as_str().as_bytes()).ok()
}

/// Answer a preflight request: 204 for an allowed origin, 403 otherwise.
pub(crate) async fn preflight(req: HttpRequest, cors: web::Data<CorsConfig>) -> HttpResponse {
    match cors.allow_origin(origin(req.headers()), &http::Method::OPTIONS) {
        CorsResponse::Allow(_) => HttpResponse::NoContent().finish(),
        CorsResponse::NoCorsHeaders | CorsResponse::Deny => HttpResponse::Forbidden().finish(),
    }
}

/// Middleware adding `Access-Control-*` headers to responses for allowed origins.
pub async fn cors_headers(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let cors = req.app_data::<web::Data<CorsConfig>>().cloned();
    let origin = origin(req.headers()).map(str::to_string);
    let method = to_http_method(req.method());

    let mut res = next.call(req).await?;

    if let (Some(cors), Some(method)) = (cors, method)
        && let CorsResponse::Allow(origin) = cors.allow_origin(origin.as_deref(), &method)
    {
        let headers = res.headers_mut();
        for (name, value) in cors.headers(origin) {
            match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Skipping invalid CORS header for origin {origin}"),
            }
        }
    }

    Ok(res)
}
