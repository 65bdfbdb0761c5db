// 🔄 Synthetic Refresh
// Stands in for a data pull: nudges every capacity by a small random delta
//
// Non-deterministic in production; tests seed the RNG.

use crate::registry::FacilityRegistry;
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

/// Default bound of the per-record delta (inclusive, both directions)
pub const DEFAULT_MAX_DELTA: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub records: usize,
    pub changed: usize,
    pub refreshed_at: DateTime<Utc>,
}

/// Owns the RNG so repeated refreshes continue one stream
pub struct Refresher {
    rng: ChaCha8Rng,
    max_delta: u8,
}

impl Refresher {
    /// Seeded from OS entropy
    pub fn new(max_delta: u8) -> Self {
        Refresher {
            rng: ChaCha8Rng::from_entropy(),
            max_delta,
        }
    }

    /// Reproducible sequence for tests and demos
    pub fn seeded(seed: u64, max_delta: u8) -> Self {
        Refresher {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_delta,
        }
    }

    pub fn refresh(&mut self, registry: &mut FacilityRegistry) -> RefreshSummary {
        perturb(registry, &mut self.rng, self.max_delta)
    }
}

impl Default for Refresher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}

/// Move every record by a uniform delta in `-max_delta..=max_delta`, clamp, reclassify
pub fn perturb<R: Rng + ?Sized>(
    registry: &mut FacilityRegistry,
    rng: &mut R,
    max_delta: u8,
) -> RefreshSummary {
    let bound = i16::from(max_delta);
    let mut changed = 0;

    for record in registry.records_mut() {
        let delta: i16 = rng.gen_range(-bound..=bound);
        let before = record.capacity_percent();
        let after = (i16::from(before) + delta).clamp(0, 100) as u8;

        if after != before {
            debug!(id = record.id(), before, after, "capacity nudged");
            changed += 1;
        }
        record.set_capacity(after);
    }

    RefreshSummary {
        records: registry.count(),
        changed,
        refreshed_at: Utc::now(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
