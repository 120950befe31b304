// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

/// Validated search parameters.
///
/// Only built by `services::validator::parse_query`, so both fields are
/// trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Business type, the `what` field of the request
    pub business_type: String,
    /// Location, the `where` field of the request
    pub location: String,
}
