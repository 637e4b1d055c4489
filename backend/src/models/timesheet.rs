//! Models for timesheets and their signature-gated approval lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    #[default]
    Draft,
    PendingCompanyApproval,
    PendingManagerApproval,
    Completed,
    Rejected,
}

impl TimesheetStatus {
    /// Canonical snake_case value stored in the database; used by the
    /// status-guarded UPDATE clauses.
    pub fn db_value(&self) -> &'static str {
        match self {
            TimesheetStatus::Draft => "draft",
            TimesheetStatus::PendingCompanyApproval => "pending_company_approval",
            TimesheetStatus::PendingManagerApproval => "pending_manager_approval",
            TimesheetStatus::Completed => "completed",
            TimesheetStatus::Rejected => "rejected",
        }
    }

    /// Completed and rejected timesheets are immutable.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TimesheetStatus::Completed | TimesheetStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
/// The two approval checkpoints in the timesheet pipeline.
pub enum ApprovalStage {
    Company,
    Manager,
}

impl ApprovalStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStage::Company => "company",
            ApprovalStage::Manager => "manager",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Timesheet {
    pub id: String,
    pub shift_id: String,
    pub status: TimesheetStatus,
    pub company_signature: Option<String>,
    pub company_approved_at: Option<DateTime<Utc>>,
    pub manager_signature: Option<String>,
    pub manager_approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    /// Snapshot PDF generated at submission, before any signature.
    pub unsigned_pdf_url: Option<String>,
    /// Signed PDF; regenerated with both signatures at manager approval.
    pub signed_pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timesheet {
    pub fn new(shift_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shift_id,
            status: TimesheetStatus::Draft,
            company_signature: None,
            company_approved_at: None,
            manager_signature: None,
            manager_approved_at: None,
            rejection_reason: None,
            rejected_by: None,
            rejected_at: None,
            unsigned_pdf_url: None,
            signed_pdf_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The approval stage this timesheet is currently waiting on, if any.
    pub fn pending_stage(&self) -> Option<ApprovalStage> {
        match self.status {
            TimesheetStatus::PendingCompanyApproval => Some(ApprovalStage::Company),
            TimesheetStatus::PendingManagerApproval => Some(ApprovalStage::Manager),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApproveTimesheetRequest {
    pub stage: ApprovalStage,
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RejectTimesheetRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimesheetResponse {
    pub id: String,
    pub shift_id: String,
    pub status: TimesheetStatus,
    pub company_signature: Option<String>,
    pub company_approved_at: Option<DateTime<Utc>>,
    pub manager_signature: Option<String>,
    pub manager_approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub unsigned_pdf_url: Option<String>,
    pub signed_pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Timesheet> for TimesheetResponse {
    fn from(timesheet: Timesheet) -> Self {
        TimesheetResponse {
            id: timesheet.id,
            shift_id: timesheet.shift_id,
            status: timesheet.status,
            company_signature: timesheet.company_signature,
            company_approved_at: timesheet.company_approved_at,
            manager_signature: timesheet.manager_signature,
            manager_approved_at: timesheet.manager_approved_at,
            rejection_reason: timesheet.rejection_reason,
            rejected_at: timesheet.rejected_at,
            unsigned_pdf_url: timesheet.unsigned_pdf_url,
            signed_pdf_url: timesheet.signed_pdf_url,
            created_at: timesheet.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_stage_follows_status() {
        let mut ts = Timesheet::new("shift-1".into(), Utc::now());
        assert_eq!(ts.pending_stage(), None);

        ts.status = TimesheetStatus::PendingCompanyApproval;
        assert_eq!(ts.pending_stage(), Some(ApprovalStage::Company));

        ts.status = TimesheetStatus::PendingManagerApproval;
        assert_eq!(ts.pending_stage(), Some(ApprovalStage::Manager));

        ts.status = TimesheetStatus::Completed;
        assert_eq!(ts.pending_stage(), None);
    }

    #[test]
    fn only_completed_and_rejected_are_terminal() {
        assert!(TimesheetStatus::Completed.is_terminal());
        assert!(TimesheetStatus::Rejected.is_terminal());
        assert!(!TimesheetStatus::Draft.is_terminal());
        assert!(!TimesheetStatus::PendingCompanyApproval.is_terminal());
        assert!(!TimesheetStatus::PendingManagerApproval.is_terminal());
    }

    #[test]
    fn status_db_values_are_snake_case() {
        assert_eq!(
            TimesheetStatus::PendingCompanyApproval.db_value(),
            "pending_company_approval"
        );
        assert_eq!(TimesheetStatus::Draft.db_value(), "draft");
    }
}
