//! Staffing calculator: pure functions over a shift's requirement vector
//! and its assignment list.
//!
//! Nothing in this module touches the database. Handlers load the shift and
//! its assignments, hand them here, and render whatever comes back. Malformed
//! counts are normalized to zero instead of rejected so fulfillment display
//! stays available even for incomplete shift data.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::assignment::ShiftAssignment;
use crate::models::shift::{RoleCode, RoleRequirements};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
/// Classification of a shift's staffing ratio. Ordered worst to best so the
/// derived `Ord` matches "more staffed".
pub enum FulfillmentBand {
    Critical,
    Low,
    Good,
    Full,
    Overstaffed,
}

/// Outstanding need for one role on a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleShortage {
    pub role: RoleCode,
    pub required: u32,
    pub filled: u32,
    pub needed: u32,
}

/// Aggregate staffing picture for a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StaffingSummary {
    pub required_total: u32,
    pub filled_total: u32,
    pub band: FulfillmentBand,
    /// Roles that still need workers. Empty means fully staffed.
    pub shortages: Vec<RoleShortage>,
    pub fully_staffed: bool,
}

/// Total workers the shift requires across all six roles.
pub fn required_total(requirements: &RoleRequirements) -> u32 {
    RoleCode::ALL
        .iter()
        .map(|role| requirements.required_for(*role))
        .sum()
}

/// Count of assignments that validly fill a slot: status outside
/// {cancelled, withdrawn, rejected} and a worker attached.
pub fn filled_total(assignments: &[ShiftAssignment]) -> u32 {
    assignments.iter().filter(|a| a.is_valid_fill()).count() as u32
}

/// Bands the filled/required ratio.
///
/// A shift that requires nobody is trivially full. Boundaries are inclusive
/// on the lower bound of each band, so exactly 80% is Good and exactly 60%
/// is Low; overstaffed starts strictly above 110%. Comparisons are done in
/// integer arithmetic so the boundaries are exact.
pub fn classify_fulfillment(filled: u32, required: u32) -> FulfillmentBand {
    if required == 0 {
        return FulfillmentBand::Full;
    }
    let filled = filled as u64;
    let required = required as u64;
    if filled * 100 > required * 110 {
        FulfillmentBand::Overstaffed
    } else if filled >= required {
        FulfillmentBand::Full
    } else if filled * 100 >= required * 80 {
        FulfillmentBand::Good
    } else if filled * 100 >= required * 60 {
        FulfillmentBand::Low
    } else {
        FulfillmentBand::Critical
    }
}

/// Per-role shortages: `max(0, required - filled)` for each role, counting
/// only valid fills whose role matches. Computation is per-role, never
/// pooled, so surplus in one role cannot offset shortage in another.
pub fn workers_needed_by_role(
    requirements: &RoleRequirements,
    assignments: &[ShiftAssignment],
) -> Vec<RoleShortage> {
    RoleCode::ALL
        .iter()
        .filter_map(|&role| {
            let required = requirements.required_for(role);
            let filled = assignments
                .iter()
                .filter(|a| a.role_code == role && a.is_valid_fill())
                .count() as u32;
            let needed = required.saturating_sub(filled);
            (needed > 0).then_some(RoleShortage {
                role,
                required,
                filled,
                needed,
            })
        })
        .collect()
}

/// Computes the full staffing picture consumed by badges and dashboards.
pub fn summarize(
    requirements: &RoleRequirements,
    assignments: &[ShiftAssignment],
) -> StaffingSummary {
    let required = required_total(requirements);
    let filled = filled_total(assignments);
    let shortages = workers_needed_by_role(requirements, assignments);
    let fully_staffed = shortages.is_empty();
    StaffingSummary {
        required_total: required,
        filled_total: filled,
        band: classify_fulfillment(filled, required),
        shortages,
        fully_staffed,
    }
}
