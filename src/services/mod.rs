// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod export;
pub mod hook;
pub mod logging;
pub mod scraper;
pub mod validator;
