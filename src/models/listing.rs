// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// One business record extracted from a search-results page.
///
/// Fields that are absent from the page are empty strings, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub category: String,
}
