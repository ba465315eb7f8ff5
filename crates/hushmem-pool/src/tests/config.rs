// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::num::NonZeroUsize;

use crate::{
    ConfigError, DEFAULT_PAGE_SIZE, DEFAULT_PRESSURE_THRESHOLD, PoolConfig, SecureBufferPool,
    StorageStrategy,
};

// =============================================================================
// Default
// =============================================================================

#[test]
fn test_default_config_values() {
    let config = PoolConfig::default();

    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.pressure_threshold, DEFAULT_PRESSURE_THRESHOLD);
    assert_eq!(config.strategy, StorageStrategy::Heap);
    assert_eq!(config.trim_interval, NonZeroUsize::new(256));
    assert_eq!(config.max_idle, None);
    assert!(config.validate().is_ok());
}

// =============================================================================
// validate()
// =============================================================================

#[test]
fn test_validate_rejects_zero_page_size() {
    let config = PoolConfig::default().with_page_size(0);

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { param: "page_size", .. })
    ));
}

#[test]
fn test_validate_rejects_non_power_of_two_page_size() {
    let config = PoolConfig::default().with_page_size(3000);

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { param: "page_size", .. })
    ));
}

#[test]
fn test_validate_rejects_threshold_out_of_unit_range() {
    for threshold in [-0.1, 1.5, f64::NAN] {
        let config = PoolConfig::default().with_pressure_threshold(threshold);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { param: "pressure_threshold", .. })
        ));
    }
}

#[test]
fn test_validate_accepts_threshold_bounds() {
    for threshold in [0.0, 1.0] {
        let config = PoolConfig::default().with_pressure_threshold(threshold);
        assert!(config.validate().is_ok());
    }
}

#[test]
fn test_pool_new_propagates_config_error() {
    let result = SecureBufferPool::<u8>::new(PoolConfig::default().with_page_size(100));

    assert!(result.is_err());
}

#[test]
fn test_page_len_scales_with_element_size() {
    let pool = SecureBufferPool::<u32>::new(PoolConfig::default()).expect("Failed to new(..)");

    assert_eq!(pool.page_len(), DEFAULT_PAGE_SIZE / 4);
}

#[test]
fn test_pool_rejects_page_smaller_than_element() {
    let config = PoolConfig::default().with_page_size(8);

    assert!(SecureBufferPool::<u64>::new(config.clone()).is_ok());
    assert_eq!(
        SecureBufferPool::<u128>::new(config).err(),
        Some(ConfigError::OutOfRange {
            param: "page_size",
            value: 8.0,
        })
    );
}
