// 🖥️ Dashboard - command surface for the TUI and the HTTP API
// Owns the registry; every UI action goes through one of these methods

use crate::config::AppConfig;
use crate::error::{RedistributionError, RedistributionResult};
use crate::facility::{load_seed_csv, FacilityId, FacilityRecord};
use crate::redistribution::{apply_redistribution, plan_redistribution, RedistributionPlan};
use crate::refresh::{RefreshSummary, Refresher};
use crate::registry::{FacilityRegistry, StatusSummary};
use crate::status::Status;
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub struct Dashboard {
    registry: FacilityRegistry,
    refresher: Refresher,
    last_refreshed: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new(registry: FacilityRegistry, refresher: Refresher) -> Self {
        Dashboard {
            registry,
            refresher,
            last_refreshed: None,
        }
    }

    /// Seed from `config.seed_file` (or the built-in list) and set up the refresh RNG
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let registry = match &config.seed_file {
            Some(path) => {
                let seeds = load_seed_csv(path)?;
                info!(path = %path.display(), facilities = seeds.len(), "loaded seed file");
                FacilityRegistry::from_seeds(seeds)?
            }
            None => FacilityRegistry::with_default_seed(),
        };

        let refresher = match config.rng_seed {
            Some(seed) => Refresher::seeded(seed, config.max_refresh_delta),
            None => Refresher::new(config.max_refresh_delta),
        };

        Ok(Self::new(registry, refresher))
    }

    pub fn records(&self) -> &[FacilityRecord] {
        self.registry.records()
    }

    pub fn registry(&self) -> &FacilityRegistry {
        &self.registry
    }

    pub fn summary(&self) -> StatusSummary {
        self.registry.summary()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn classification_of(&self, id: FacilityId) -> RedistributionResult<Status> {
        self.registry
            .find_by_id(id)
            .map(|r| r.status())
            .ok_or(RedistributionError::RecordNotFound(id))
    }

    pub fn plan_for(&self, id: FacilityId) -> RedistributionResult<RedistributionPlan> {
        let result = plan_redistribution(&self.registry, id);
        match &result {
            Ok(plan) => info!(
                source = plan.source_id,
                target = plan.target_id,
                amount = plan.amount_percent,
                "redistribution planned"
            ),
            Err(err) => warn!(source = id, %err, "redistribution not possible"),
        }
        result
    }

    /// The "simulate" action: plan for the first Overload facility
    pub fn plan_for_first_overload(&self) -> RedistributionResult<RedistributionPlan> {
        let source = self
            .registry
            .first_overloaded()
            .ok_or(RedistributionError::NoOverloadedFacility)?;
        self.plan_for(source.id())
    }

    /// Apply a plan only if it matches what the current data would plan
    pub fn confirm(&mut self, plan: &RedistributionPlan) -> RedistributionResult<()> {
        if let Err(err) = self.check_current(plan) {
            warn!(source = plan.source_id, %err, "redistribution rejected");
            return Err(err);
        }

        if let Err(err) = apply_redistribution(&mut self.registry, plan) {
            warn!(%err, "redistribution apply failed");
            return Err(err);
        }

        info!(
            source = plan.source_id,
            target = plan.target_id,
            amount = plan.amount_percent,
            "redistribution applied"
        );
        Ok(())
    }

    fn check_current(&self, plan: &RedistributionPlan) -> RedistributionResult<()> {
        if plan.source_id == plan.target_id {
            return Err(RedistributionError::SelfTransfer(plan.source_id));
        }

        match plan_redistribution(&self.registry, plan.source_id) {
            Ok(current) if current == *plan => Ok(()),
            Err(RedistributionError::SourceNotFound(id)) => Err(RedistributionError::RecordNotFound(id)),
            _ => Err(RedistributionError::StalePlan(plan.source_id)),
        }
    }

    pub fn refresh(&mut self) -> RefreshSummary {
        let summary = self.refresher.refresh(&mut self.registry);
        self.last_refreshed = Some(summary.refreshed_at);
        info!(changed = summary.changed, records = summary.records, "data refreshed");
        summary
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(FacilityRegistry::default(), Refresher::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
