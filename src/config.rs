// ABOUTME: Deployment configuration for the directory engine
// ABOUTME: Tuning knobs read from the environment with documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Tuning knobs for the directory engine, read once at startup
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Per-operation store timeout; a call exceeding it surfaces as `StoreTimeout`
    pub store_timeout: Duration,
    /// Page size applied when the caller does not pass one
    pub default_page_size: usize,
    /// Upper bound on caller-requested page sizes
    pub max_page_size: usize,
    /// Batch size of projected scans (pagination skip phases, statistics tallies)
    pub scan_batch_size: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(5000),
            default_page_size: 20,
            max_page_size: 100,
            scan_batch_size: 500,
        }
    }
}

impl DirectoryConfig {
    /// Read configuration from environment variables, falling back to the
    /// documented defaults. Out-of-range combinations are corrected and
    /// logged rather than rejected, so a bad deployment variable cannot take
    /// the service down.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            store_timeout: Duration::from_millis(env_parse(
                "STORE_TIMEOUT_MS",
                defaults.store_timeout.as_millis() as u64,
            )),
            default_page_size: env_parse("DIRECTORY_DEFAULT_PAGE_SIZE", defaults.default_page_size),
            max_page_size: env_parse("DIRECTORY_MAX_PAGE_SIZE", defaults.max_page_size),
            scan_batch_size: env_parse("DIRECTORY_SCAN_BATCH_SIZE", defaults.scan_batch_size),
        };

        if config.max_page_size == 0 {
            warn!("DIRECTORY_MAX_PAGE_SIZE must be positive, using default");
            config.max_page_size = defaults.max_page_size;
        }
        if config.default_page_size == 0 || config.default_page_size > config.max_page_size {
            warn!(
                default_page_size = config.default_page_size,
                max_page_size = config.max_page_size,
                "default page size out of range, using max"
            );
            config.default_page_size = defaults.default_page_size.min(config.max_page_size);
        }
        if config.scan_batch_size == 0 {
            warn!("DIRECTORY_SCAN_BATCH_SIZE must be positive, using default");
            config.scan_batch_size = defaults.scan_batch_size;
        }
        config
    }
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparseable environment value, using default");
            default
        }),
        Err(_) => default,
    }
}
