// 🗂️ Facility Registry - the one owned, mutable table
// Ordered as seeded; records are never added or removed after construction

use crate::facility::{default_seed, FacilityId, FacilityRecord, FacilitySeed};
use crate::status::Status;
use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::HashSet;

pub struct FacilityRegistry {
    records: Vec<FacilityRecord>,
}

impl FacilityRegistry {
    /// Build a registry from seed tuples, rejecting duplicate ids
    pub fn from_seeds(seeds: Vec<FacilitySeed>) -> Result<Self> {
        let mut seen = HashSet::new();
        for seed in &seeds {
            if !seen.insert(seed.id) {
                bail!("Duplicate facility id in seed data: {}", seed.id);
            }
        }

        Ok(FacilityRegistry {
            records: seeds.into_iter().map(FacilityRecord::from).collect(),
        })
    }

    /// Registry holding the built-in Yogyakarta seed
    pub fn with_default_seed() -> Self {
        FacilityRegistry {
            records: default_seed().into_iter().map(FacilityRecord::from).collect(),
        }
    }

    /// All records in registry order
    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    pub fn find_by_id(&self, id: FacilityId) -> Option<&FacilityRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: FacilityId) -> Option<&mut FacilityRecord> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut FacilityRecord> {
        self.records.iter_mut()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn by_status(&self, status: Status) -> Vec<&FacilityRecord> {
        self.records.iter().filter(|r| r.status() == status).collect()
    }

    /// First Overload record in registry order
    pub fn first_overloaded(&self) -> Option<&FacilityRecord> {
        self.records.iter().find(|r| r.status() == Status::Overload)
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();

        for record in &self.records {
            match record.status() {
                Status::Safe => summary.safe += 1,
                Status::Warning => summary.warning += 1,
                Status::Overload => summary.overload += 1,
            }
        }

        summary.total = self.records.len();
        summary
    }
}

impl Default for FacilityRegistry {
    fn default() -> Self {
        Self::with_default_seed()
    }
}

/// Count of facilities per status
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub safe: usize,
    pub warning: usize,
    pub overload: usize,
}

impl StatusSummary {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Safe => self.safe,
            Status::Warning => self.warning,
            Status::Overload => self.overload,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
