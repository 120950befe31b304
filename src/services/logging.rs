// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Tracing subscriber set-up.

use tracing_subscriber::EnvFilter;

/// Build the log filter: `RUST_LOG` wins, otherwise `default_level`
pub fn env_filter(default_level: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))
}

/// Install the global fmt subscriber. Call once, from `main`.
pub fn init(default_level: &str) -> Result<(), tracing_subscriber::filter::ParseError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level)?)
        .with_target(false)
        .init();
    Ok(())
}
