//! Models for a worker's assignment to a shift slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::shift::RoleCode;
use crate::types::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Lifecycle status of an assignment. Assignments are never physically
/// deleted while the shift exists; cancellation-like outcomes are soft
/// states.
pub enum AssignmentStatus {
    #[default]
    Assigned,
    ClockedIn,
    OnBreak,
    ShiftEnded,
    NoShow,
    Cancelled,
    Withdrawn,
    Rejected,
    UpForGrabs,
}

impl AssignmentStatus {
    /// Whether an assignment in this status still occupies its slot.
    ///
    /// Only cancelled, withdrawn, and rejected assignments stop counting.
    /// A no-show still holds the slot until it is explicitly reassigned.
    pub fn counts_toward_fill(&self) -> bool {
        !matches!(
            self,
            AssignmentStatus::Cancelled | AssignmentStatus::Withdrawn | AssignmentStatus::Rejected
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShiftAssignment {
    pub id: String,
    pub shift_id: String,
    /// The assigned worker; `None` for an open slot (e.g. up for grabs).
    pub worker_id: Option<String>,
    pub role_code: RoleCode,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftAssignment {
    pub fn new(
        shift_id: String,
        worker_id: Option<String>,
        role_code: RoleCode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shift_id,
            worker_id,
            role_code,
            status: AssignmentStatus::Assigned,
            created_at: now,
            updated_at: now,
        }
    }

    /// Valid-assignment predicate: the record fills a slot only when its
    /// status counts and a worker is actually attached.
    pub fn is_valid_fill(&self) -> bool {
        self.status.counts_toward_fill() && self.worker_id.is_some()
    }

    /// True when this record gives `worker_id` crew-chief standing on the
    /// shift (used by the company-stage approval rule).
    pub fn is_active_crew_chief(&self) -> bool {
        self.role_code == RoleCode::CrewChief && self.is_valid_fill()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    #[schema(value_type = Option<String>)]
    pub worker_id: Option<UserId>,
    pub role_code: RoleCode,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateAssignmentStatusRequest {
    pub status: AssignmentStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignmentResponse {
    pub id: String,
    pub shift_id: String,
    pub worker_id: Option<String>,
    pub role_code: RoleCode,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ShiftAssignment> for AssignmentResponse {
    fn from(assignment: ShiftAssignment) -> Self {
        AssignmentResponse {
            id: assignment.id,
            shift_id: assignment.shift_id,
            worker_id: assignment.worker_id,
            role_code: assignment.role_code,
            status: assignment.status,
            created_at: assignment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(status: AssignmentStatus, worker: Option<&str>) -> ShiftAssignment {
        let mut a = ShiftAssignment::new(
            "shift-1".into(),
            worker.map(str::to_owned),
            RoleCode::Stagehand,
            Utc::now(),
        );
        a.status = status;
        a
    }

    #[test]
    fn cancelled_withdrawn_rejected_do_not_fill() {
        for status in [
            AssignmentStatus::Cancelled,
            AssignmentStatus::Withdrawn,
            AssignmentStatus::Rejected,
        ] {
            assert!(!assignment(status, Some("w1")).is_valid_fill());
        }
    }

    #[test]
    fn soft_states_still_fill_when_a_worker_is_attached() {
        for status in [
            AssignmentStatus::Assigned,
            AssignmentStatus::ClockedIn,
            AssignmentStatus::OnBreak,
            AssignmentStatus::ShiftEnded,
            AssignmentStatus::NoShow,
            AssignmentStatus::UpForGrabs,
        ] {
            assert!(assignment(status, Some("w1")).is_valid_fill());
        }
    }

    #[test]
    fn open_slot_without_worker_never_fills() {
        assert!(!assignment(AssignmentStatus::Assigned, None).is_valid_fill());
        assert!(!assignment(AssignmentStatus::UpForGrabs, None).is_valid_fill());
    }

    #[test]
    fn crew_chief_standing_requires_role_and_valid_fill() {
        let mut a = assignment(AssignmentStatus::ClockedIn, Some("w1"));
        a.role_code = RoleCode::CrewChief;
        assert!(a.is_active_crew_chief());

        a.status = AssignmentStatus::Withdrawn;
        assert!(!a.is_active_crew_chief());
    }
}
