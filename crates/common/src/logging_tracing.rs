// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

const GATE_LOG: &str = "GATE_LOG";

/// Install the global tracing subscriber.
///
/// The filter follows `RUST_LOG` syntax, read from `GATE_LOG`, and defaults to `warn`.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(GATE_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
