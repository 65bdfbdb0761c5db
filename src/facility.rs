// 🏭 Facility Records - Waste-bank collection points
// Seed tuples come in, records with a derived status come out

use crate::status::{classify, Status};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type FacilityId = u32;

/// Upper bound of a capacity percentage
pub const MAX_CAPACITY: u8 = 100;

// ============================================================================
// SEED
// ============================================================================

/// Raw seed tuple as read from the built-in list or a CSV file.
///
/// A `status` column in the file is ignored; status is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySeed {
    pub id: FacilityId,
    pub district: String,
    pub name: String,
    pub capacity_percent: u8,
}

impl FacilitySeed {
    pub fn new(id: FacilityId, district: &str, name: &str, capacity_percent: u8) -> Self {
        FacilitySeed {
            id,
            district: district.to_string(),
            name: name.to_string(),
            capacity_percent,
        }
    }
}

// ============================================================================
// FACILITY RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilityRecord {
    id: FacilityId,
    district: String,
    name: String,
    capacity_percent: u8,
    status: Status,
}

impl FacilityRecord {
    pub fn id(&self) -> FacilityId {
        self.id
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity_percent(&self) -> u8 {
        self.capacity_percent
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Overwrite capacity, clamped to 0..=100, and reclassify in the same step
    pub(crate) fn set_capacity(&mut self, capacity_percent: u8) {
        self.capacity_percent = capacity_percent.min(MAX_CAPACITY);
        self.status = classify(self.capacity_percent);
    }
}

impl From<FacilitySeed> for FacilityRecord {
    fn from(seed: FacilitySeed) -> Self {
        let capacity_percent = seed.capacity_percent.min(MAX_CAPACITY);
        FacilityRecord {
            id: seed.id,
            district: seed.district,
            name: seed.name,
            capacity_percent,
            status: classify(capacity_percent),
        }
    }
}

// ============================================================================
// SEED SOURCES
// ============================================================================

/// The 14 waste banks of Kota Yogyakarta used by the demo deployment
pub fn default_seed() -> Vec<FacilitySeed> {
    vec![
        FacilitySeed::new(1, "Umbulharjo", "Bank Sampah Srikandi", 65),
        FacilitySeed::new(2, "Gondokusuman", "Bank Sampah Hijau Lestari", 85),
        FacilitySeed::new(3, "Jetis", "Bank Sampah Merapi", 95),
        FacilitySeed::new(4, "Mergangsan", "Bank Sampah Bumi Hijau", 45),
        FacilitySeed::new(5, "Danurejan", "Bank Sampah Ceria", 78),
        FacilitySeed::new(6, "Gedongtengen", "Bank Sampah Sejahtera", 30),
        FacilitySeed::new(7, "Ngampilan", "Bank Sampah Mandiri", 88),
        FacilitySeed::new(8, "Wirobrajan", "Bank Sampah Bersih", 92),
        FacilitySeed::new(9, "Mantrijeron", "Bank Sampah Hijau", 55),
        FacilitySeed::new(10, "Kraton", "Bank Sampah Keraton", 70),
        FacilitySeed::new(11, "Pakualaman", "Bank Sampah Pakualaman", 82),
        FacilitySeed::new(12, "Tegalrejo", "Bank Sampah Tegalrejo", 40),
        FacilitySeed::new(13, "Kotagede", "Bank Sampah Kotagede", 75),
        FacilitySeed::new(14, "Gondomanan", "Bank Sampah Gondomanan", 60),
    ]
}

/// Load seed tuples from a CSV file with an `id,district,name,capacity_percent` header
pub fn load_seed_csv(csv_path: &Path) -> Result<Vec<FacilitySeed>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open seed file: {:?}", csv_path))?;

    let mut seeds = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let seed: FacilitySeed = result
            .with_context(|| format!("Failed to deserialize facility on row {}", line + 1))?;

        if seed.capacity_percent > MAX_CAPACITY {
            bail!(
                "Facility {} has capacity {}% (must be 0-{})",
                seed.id,
                seed.capacity_percent,
                MAX_CAPACITY
            );
        }

        seeds.push(seed);
    }

    Ok(seeds)
}

// ============================================================================
// TESTS
// ============================================================================
