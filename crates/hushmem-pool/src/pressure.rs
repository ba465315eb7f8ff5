// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Memory-pressure signal sources consulted by `trim()`.

use core::fmt;

/// A snapshot of memory load relative to a high-water mark.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MemoryLoad {
    /// Bytes currently in use.
    pub used_bytes: u64,
    /// Bytes at which the system is considered fully loaded.
    pub high_water_bytes: u64,
}

impl MemoryLoad {
    /// Returns `used / high_water`, or `1.0` when the high-water mark is zero.
    pub fn fraction(&self) -> f64 {
        if self.high_water_bytes == 0 {
            return 1.0;
        }

        self.used_bytes as f64 / self.high_water_bytes as f64
    }
}

/// Source of the current memory load.
pub trait PressureSource: Send + Sync + fmt::Debug {
    /// Returns the current load, or `None` when it cannot be determined.
    fn memory_load(&self) -> Option<MemoryLoad>;
}

/// Reads the machine-wide load from the operating system.
///
/// On Linux this is `sysinfo(2)`: used = total - free - buffers. Elsewhere no
/// reading is available and `trim()` only evicts under a `0.0` threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPressure;

impl PressureSource for SystemPressure {
    #[cfg(target_os = "linux")]
    fn memory_load(&self) -> Option<MemoryLoad> {
        // SAFETY: sysinfo only writes into the provided struct.
        let mut info: libc::sysinfo = unsafe { core::mem::zeroed() };
        if unsafe { libc::sysinfo(&mut info) } != 0 {
            return None;
        }

        let unit = u64::from(info.mem_unit.max(1));
        let total = (info.totalram as u64).saturating_mul(unit);
        let available = (info.freeram as u64)
            .saturating_add(info.bufferram as u64)
            .saturating_mul(unit);

        Some(MemoryLoad {
            used_bytes: total.saturating_sub(available),
            high_water_bytes: total,
        })
    }

    #[cfg(not(target_os = "linux"))]
    fn memory_load(&self) -> Option<MemoryLoad> {
        None
    }
}

/// A constant load, for embedders that compute pressure themselves and for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPressure(pub Option<MemoryLoad>);

impl FixedPressure {
    /// A source that always reports `fraction` of a nominal high-water mark.
    pub fn at(fraction: f64) -> Self {
        const NOMINAL: u64 = 1 << 30;

        Self(Some(MemoryLoad {
            used_bytes: (NOMINAL as f64 * fraction.clamp(0.0, 1.0)) as u64,
            high_water_bytes: NOMINAL,
        }))
    }
}

impl PressureSource for FixedPressure {
    fn memory_load(&self) -> Option<MemoryLoad> {
        self.0
    }
}
