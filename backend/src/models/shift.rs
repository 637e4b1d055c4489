//! Models for shifts and their per-role worker requirements.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Pending,
    Active,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Worker specialization tags used on both requirement vectors and
/// assignment records.
pub enum RoleCode {
    CrewChief,
    Stagehand,
    ForkOperator,
    ReachForkOperator,
    Rigger,
    GeneralLaborer,
}

impl RoleCode {
    /// All role codes, in display order.
    pub const ALL: [RoleCode; 6] = [
        RoleCode::CrewChief,
        RoleCode::Stagehand,
        RoleCode::ForkOperator,
        RoleCode::ReachForkOperator,
        RoleCode::Rigger,
        RoleCode::GeneralLaborer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCode::CrewChief => "crew_chief",
            RoleCode::Stagehand => "stagehand",
            RoleCode::ForkOperator => "fork_operator",
            RoleCode::ReachForkOperator => "reach_fork_operator",
            RoleCode::Rigger => "rigger",
            RoleCode::GeneralLaborer => "general_laborer",
        }
    }

    /// Human-readable label used on rendered timesheets.
    pub fn label(&self) -> &'static str {
        match self {
            RoleCode::CrewChief => "Crew Chief",
            RoleCode::Stagehand => "Stagehand",
            RoleCode::ForkOperator => "Fork Operator",
            RoleCode::ReachForkOperator => "Reach Fork Operator",
            RoleCode::Rigger => "Rigger",
            RoleCode::GeneralLaborer => "General Laborer",
        }
    }
}

/// Per-role worker requirement counts for a shift.
///
/// Counts are nullable in storage; a missing count reads as zero. Negative
/// values never originate from this service (payload validation rejects
/// them) but imported rows are normalized to zero rather than rejected so
/// fulfillment display stays available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleRequirements {
    pub crew_chiefs: Option<i32>,
    pub stagehands: Option<i32>,
    pub fork_operators: Option<i32>,
    pub reach_fork_operators: Option<i32>,
    pub riggers: Option<i32>,
    pub general_laborers: Option<i32>,
}

impl RoleRequirements {
    /// Required head count for one role; the total mapping from role code to
    /// its requirement field.
    pub fn required_for(&self, role: RoleCode) -> u32 {
        let raw = match role {
            RoleCode::CrewChief => self.crew_chiefs,
            RoleCode::Stagehand => self.stagehands,
            RoleCode::ForkOperator => self.fork_operators,
            RoleCode::ReachForkOperator => self.reach_fork_operators,
            RoleCode::Rigger => self.riggers,
            RoleCode::GeneralLaborer => self.general_laborers,
        };
        raw.unwrap_or(0).max(0) as u32
    }

    /// Enforces the business policy that every shift carries at least
    /// `min` crew chiefs. Applied where requirement vectors are
    /// constructed, never inside the staffing calculator.
    pub fn with_minimum_crew_chiefs(mut self, min: u32) -> Self {
        if self.required_for(RoleCode::CrewChief) < min {
            self.crew_chiefs = Some(min as i32);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Shift {
    pub id: String,
    pub job_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: ShiftStatus,
    pub required_crew_chiefs: Option<i32>,
    pub required_stagehands: Option<i32>,
    pub required_fork_operators: Option<i32>,
    pub required_reach_fork_operators: Option<i32>,
    pub required_riggers: Option<i32>,
    pub required_general_laborers: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    pub fn new(
        job_id: String,
        date: NaiveDate,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        requirements: RoleRequirements,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_id,
            date,
            start_time,
            end_time,
            status: ShiftStatus::Pending,
            required_crew_chiefs: requirements.crew_chiefs,
            required_stagehands: requirements.stagehands,
            required_fork_operators: requirements.fork_operators,
            required_reach_fork_operators: requirements.reach_fork_operators,
            required_riggers: requirements.riggers,
            required_general_laborers: requirements.general_laborers,
            created_at: now,
            updated_at: now,
        }
    }

    /// The shift's requirement vector as a value type the staffing
    /// calculator consumes.
    pub fn role_requirements(&self) -> RoleRequirements {
        RoleRequirements {
            crew_chiefs: self.required_crew_chiefs,
            stagehands: self.required_stagehands,
            fork_operators: self.required_fork_operators,
            reach_fork_operators: self.required_reach_fork_operators,
            riggers: self.required_riggers,
            general_laborers: self.required_general_laborers,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateShiftRequest {
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[validate(range(min = 0))]
    pub required_crew_chiefs: Option<i32>,
    #[validate(range(min = 0))]
    pub required_stagehands: Option<i32>,
    #[validate(range(min = 0))]
    pub required_fork_operators: Option<i32>,
    #[validate(range(min = 0))]
    pub required_reach_fork_operators: Option<i32>,
    #[validate(range(min = 0))]
    pub required_riggers: Option<i32>,
    #[validate(range(min = 0))]
    pub required_general_laborers: Option<i32>,
}

impl CreateShiftRequest {
    pub fn requirements(&self) -> RoleRequirements {
        RoleRequirements {
            crew_chiefs: self.required_crew_chiefs,
            stagehands: self.required_stagehands,
            fork_operators: self.required_fork_operators,
            reach_fork_operators: self.required_reach_fork_operators,
            riggers: self.required_riggers,
            general_laborers: self.required_general_laborers,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShiftResponse {
    pub id: String,
    pub job_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: ShiftStatus,
    pub requirements: RoleRequirements,
    pub created_at: DateTime<Utc>,
}

impl From<Shift> for ShiftResponse {
    fn from(shift: Shift) -> Self {
        let requirements = shift.role_requirements();
        ShiftResponse {
            id: shift.id,
            job_id: shift.job_id,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            status: shift.status,
            requirements,
            created_at: shift.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_for_reads_missing_counts_as_zero() {
        let reqs = RoleRequirements {
            stagehands: Some(5),
            ..Default::default()
        };
        assert_eq!(reqs.required_for(RoleCode::Stagehand), 5);
        assert_eq!(reqs.required_for(RoleCode::Rigger), 0);
        assert_eq!(reqs.required_for(RoleCode::CrewChief), 0);
    }

    #[test]
    fn required_for_normalizes_negative_counts_to_zero() {
        let reqs = RoleRequirements {
            riggers: Some(-3),
            ..Default::default()
        };
        assert_eq!(reqs.required_for(RoleCode::Rigger), 0);
    }

    #[test]
    fn minimum_crew_chief_policy_raises_low_counts() {
        let reqs = RoleRequirements::default().with_minimum_crew_chiefs(1);
        assert_eq!(reqs.required_for(RoleCode::CrewChief), 1);

        let reqs = RoleRequirements {
            crew_chiefs: Some(3),
            ..Default::default()
        }
        .with_minimum_crew_chiefs(1);
        assert_eq!(reqs.required_for(RoleCode::CrewChief), 3);
    }

    #[test]
    fn role_code_serde_snake_case() {
        let role: RoleCode = serde_json::from_str("\"reach_fork_operator\"").unwrap();
        assert_eq!(role, RoleCode::ReachForkOperator);
        let v = serde_json::to_value(RoleCode::CrewChief).unwrap();
        assert_eq!(v, serde_json::json!("crew_chief"));
    }
}
