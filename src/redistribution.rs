// 🔁 Redistribution Planner
// Picks the emptiest Safe facility and computes how much load moves to it

use crate::error::{RedistributionError, RedistributionResult};
use crate::facility::{FacilityId, FacilityRecord, MAX_CAPACITY};
use crate::registry::FacilityRegistry;
use crate::status::{classify, Status, WARNING_MAX};
use serde::{Deserialize, Serialize};

/// One fifth of the load above the Warning ceiling is moved
const TRANSFER_DIVISOR: i32 = 5;

// ============================================================================
// PLAN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedistributionPlan {
    pub source_id: FacilityId,
    pub target_id: FacilityId,
    pub amount_percent: u8,
    pub resulting_source_capacity: u8,
    pub resulting_target_capacity: u8,
}

impl RedistributionPlan {
    pub fn resulting_source_status(&self) -> Status {
        classify(self.resulting_source_capacity)
    }

    pub fn resulting_target_status(&self) -> Status {
        classify(self.resulting_target_capacity)
    }
}

/// `floor((capacity - 85) * 0.2)`; negative below the Warning ceiling
pub fn transfer_amount(capacity_percent: u8) -> i32 {
    (i32::from(capacity_percent) - i32::from(WARNING_MAX)).div_euclid(TRANSFER_DIVISOR)
}

/// Whether a facility at this capacity has any whole percent to move
pub fn has_transferable_load(capacity_percent: u8) -> bool {
    transfer_amount(capacity_percent) > 0
}

// ============================================================================
// PLANNING
// ============================================================================

/// Compute a plan for moving load off `source_id`. Never mutates the registry.
///
/// Ties on the lowest capacity go to the record that comes first in registry order.
pub fn plan_redistribution(
    registry: &FacilityRegistry,
    source_id: FacilityId,
) -> RedistributionResult<RedistributionPlan> {
    let source = registry
        .find_by_id(source_id)
        .ok_or(RedistributionError::SourceNotFound(source_id))?;

    let target = select_target(registry, source_id)
        .ok_or(RedistributionError::NoTargetAvailable(source_id))?;

    let amount = transfer_amount(source.capacity_percent());
    if amount <= 0 {
        return Err(RedistributionError::NothingToRedistribute {
            id: source_id,
            capacity_percent: source.capacity_percent(),
        });
    }

    // amount <= (100 - 85) / 5, so it always fits in a u8
    let amount = amount as u8;

    Ok(RedistributionPlan {
        source_id,
        target_id: target.id(),
        amount_percent: amount,
        resulting_source_capacity: source.capacity_percent().saturating_sub(amount),
        resulting_target_capacity: target
            .capacity_percent()
            .saturating_add(amount)
            .min(MAX_CAPACITY),
    })
}

fn select_target(registry: &FacilityRegistry, source_id: FacilityId) -> Option<&FacilityRecord> {
    registry
        .records()
        .iter()
        .filter(|r| r.id() != source_id && r.status() == Status::Safe)
        .fold(None, |best: Option<&FacilityRecord>, candidate| match best {
            Some(b) if b.capacity_percent() <= candidate.capacity_percent() => Some(b),
            _ => Some(candidate),
        })
}

// ============================================================================
// APPLY
// ============================================================================

/// Write the plan's resulting capacities back and reclassify both records.
///
/// Both ids are checked before anything is written.
pub fn apply_redistribution(
    registry: &mut FacilityRegistry,
    plan: &RedistributionPlan,
) -> RedistributionResult<()> {
    if plan.source_id == plan.target_id {
        return Err(RedistributionError::SelfTransfer(plan.source_id));
    }

    for id in [plan.source_id, plan.target_id] {
        if registry.find_by_id(id).is_none() {
            return Err(RedistributionError::RecordNotFound(id));
        }
    }

    if let Some(source) = registry.find_mut(plan.source_id) {
        source.set_capacity(plan.resulting_source_capacity);
    }
    if let Some(target) = registry.find_mut(plan.target_id) {
        target.set_capacity(plan.resulting_target_capacity);
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::FacilitySeed;

    fn registry(seeds: &[(FacilityId, u8)]) -> FacilityRegistry {
        FacilityRegistry::from_seeds(
            seeds
                .iter()
                .map(|(id, cap)| FacilitySeed::new(*id, "District", &format!("Bank {}", id), *cap))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_transfer_amount_formula() {
        assert_eq!(transfer_amount(95), 2);
        assert_eq!(transfer_amount(100), 3);
        assert_eq!(transfer_amount(90), 1);
        assert_eq!(transfer_amount(89), 0);
        assert_eq!(transfer_amount(85), 0);
        assert_eq!(transfer_amount(80), -1);
    }

    #[test]
    fn test_scenario_ninety_five_to_thirty() {
        let reg = registry(&[(1, 95), (2, 60), (3, 30), (4, 78)]);
        let plan = plan_redistribution(&reg, 1).unwrap();

        assert_eq!(plan.target_id, 3);
        assert_eq!(plan.amount_percent, 2);
        assert_eq!(plan.resulting_source_capacity, 93);
        assert_eq!(plan.resulting_target_capacity, 32);
        assert_eq!(plan.resulting_source_status(), Status::Overload);
        assert_eq!(plan.resulting_target_status(), Status::Safe);
    }

    #[test]
    fn test_default_seed_plan_for_jetis() {
        let reg = FacilityRegistry::default();
        let plan = plan_redistribution(&reg, 3).unwrap();

        // Gedongtengen (30) is the emptiest Safe facility
        assert_eq!(plan.target_id, 6);
        assert_eq!(plan.amount_percent, 2);
    }

    #[test]
    fn test_source_not_found() {
        let reg = registry(&[(1, 95), (2, 30)]);

        assert_eq!(
            plan_redistribution(&reg, 42),
            Err(RedistributionError::SourceNotFound(42))
        );
    }

    #[test]
    fn test_no_safe_target() {
        let reg = registry(&[(1, 95), (2, 80), (3, 90)]);

        assert_eq!(
            plan_redistribution(&reg, 1),
            Err(RedistributionError::NoTargetAvailable(1))
        );
    }

    #[test]
    fn test_source_is_never_its_own_target() {
        // The only Safe record is the source itself
        let reg = registry(&[(1, 50), (2, 90)]);

        assert_eq!(
            plan_redistribution(&reg, 1),
            Err(RedistributionError::NoTargetAvailable(1))
        );
    }

    #[test]
    fn test_target_is_always_safe() {
        let reg = FacilityRegistry::default();

        for record in reg.records() {
            if let Ok(plan) = plan_redistribution(&reg, record.id()) {
                let target = reg.find_by_id(plan.target_id).unwrap();
                assert_ne!(plan.target_id, plan.source_id);
                assert_eq!(target.status(), Status::Safe);
            }
        }
    }

    #[test]
    fn test_tie_break_prefers_registry_order() {
        let reg = registry(&[(1, 95), (7, 20), (3, 20), (4, 20)]);
        let plan = plan_redistribution(&reg, 1).unwrap();

        assert_eq!(plan.target_id, 7);
    }

    #[test]
    fn test_low_capacity_source_has_nothing_to_move() {
        let reg = registry(&[(1, 88), (2, 30)]);

        assert_eq!(
            plan_redistribution(&reg, 1),
            Err(RedistributionError::NothingToRedistribute { id: 1, capacity_percent: 88 })
        );
    }

    #[test]
    fn test_target_can_leave_safe_band() {
        let mut reg = registry(&[(1, 100), (2, 70)]);
        let plan = plan_redistribution(&reg, 1).unwrap();
        assert_eq!(plan.resulting_target_capacity, 73);

        apply_redistribution(&mut reg, &plan).unwrap();
        assert_eq!(reg.find_by_id(2).unwrap().status(), Status::Warning);
    }

    #[test]
    fn test_plan_then_apply_round_trip() {
        let mut reg = FacilityRegistry::default();
        let before: Vec<_> = reg.records().to_vec();

        let plan = plan_redistribution(&reg, 8).unwrap();
        apply_redistribution(&mut reg, &plan).unwrap();

        assert_eq!(reg.count(), before.len());
        for (old, new) in before.iter().zip(reg.records()) {
            if new.id() == plan.source_id {
                assert_eq!(new.capacity_percent(), plan.resulting_source_capacity);
            } else if new.id() == plan.target_id {
                assert_eq!(new.capacity_percent(), plan.resulting_target_capacity);
            } else {
                assert_eq!(old, new);
            }
            assert_eq!(new.status(), classify(new.capacity_percent()));
        }
    }

    #[test]
    fn test_planning_has_no_side_effect() {
        let reg = FacilityRegistry::default();
        let before: Vec<_> = reg.records().to_vec();

        let _ = plan_redistribution(&reg, 3);

        assert_eq!(reg.records(), before.as_slice());
    }

    #[test]
    fn test_transferable_load_threshold() {
        assert!(!has_transferable_load(70));
        assert!(!has_transferable_load(88));
        assert!(has_transferable_load(90));
        assert!(has_transferable_load(100));
    }

    #[test]
    fn test_apply_rejects_self_transfer() {
        let mut reg = registry(&[(1, 95), (2, 30)]);
        let plan = RedistributionPlan {
            source_id: 1,
            target_id: 1,
            amount_percent: 2,
            resulting_source_capacity: 93,
            resulting_target_capacity: 10,
        };

        assert_eq!(
            apply_redistribution(&mut reg, &plan),
            Err(RedistributionError::SelfTransfer(1))
        );
        assert_eq!(reg.find_by_id(1).unwrap().capacity_percent(), 95);
    }

    #[test]
    fn test_apply_with_vanished_record() {
        let mut reg = registry(&[(1, 95), (2, 30)]);
        let plan = RedistributionPlan {
            source_id: 1,
            target_id: 9,
            amount_percent: 2,
            resulting_source_capacity: 93,
            resulting_target_capacity: 32,
        };

        assert_eq!(
            apply_redistribution(&mut reg, &plan),
            Err(RedistributionError::RecordNotFound(9))
        );
        // Nothing written when the check fails
        assert_eq!(reg.find_by_id(1).unwrap().capacity_percent(), 95);
    }
}
