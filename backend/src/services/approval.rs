//! Timesheet approval state machine.
//!
//! The lifecycle is draft → pending_company_approval →
//! pending_manager_approval → completed, with rejected reachable from
//! either pending state and both completed and rejected terminal.
//!
//! Transition legality and actor authorization are decided by pure
//! functions over the loaded records ([`plan_approval`], [`plan_rejection`],
//! [`available_actions`]); [`TimesheetApprovalService`] then executes the
//! plan: render the milestone PDF first, then persist signature, approval
//! timestamp, status, and artifact reference in one status-guarded UPDATE
//! inside a transaction. A renderer failure therefore aborts the whole
//! transition before anything is written, and a lost race against a
//! concurrent transition surfaces as an invalid-state error instead of a
//! double-advance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::assignment::ShiftAssignment;
use crate::models::shift::Shift;
use crate::models::timesheet::{ApprovalStage, Timesheet, TimesheetStatus};
use crate::models::user::User;
use crate::repositories::{self, transaction};
use crate::services::pdf::{
    PdfRenderError, PdfVariant, TimesheetDocument, TimesheetPdfRenderer, WorkerLine,
};
use crate::types::TimesheetId;
use crate::validation::rules;

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("{0}")]
    NotFound(String),
    /// The timesheet is not in the state the operation requires
    /// (double-approval, submit-after-submit, acting on a terminal
    /// timesheet, or a lost concurrency race).
    #[error("{0}")]
    InvalidState(String),
    /// The actor lacks the role or relationship the current stage requires.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    /// PDF rendering/storage failed; the transition was aborted with no
    /// partial state, so the caller may retry the same request.
    #[error("timesheet document generation failed: {0}")]
    Dependency(#[from] PdfRenderError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ApprovalError> for AppError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::NotFound(msg) => AppError::NotFound(msg),
            ApprovalError::InvalidState(msg) => AppError::Conflict(msg),
            ApprovalError::Unauthorized(msg) => AppError::Forbidden(msg),
            ApprovalError::Validation(msg) => AppError::Validation(vec![msg]),
            ApprovalError::Dependency(e) => AppError::DependencyFailure(e.to_string()),
            ApprovalError::Database(e) => e.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

/// Relationship facts needed to authorize an actor at a stage: which
/// company owns the shift's job, and which workers hold a valid crew-chief
/// assignment on the shift.
#[derive(Debug, Clone)]
pub struct ApprovalContext {
    pub company_id: String,
    pub crew_chief_ids: Vec<String>,
}

impl ApprovalContext {
    pub fn new(company_id: String, assignments: &[ShiftAssignment]) -> Self {
        let crew_chief_ids = assignments
            .iter()
            .filter(|a| a.is_active_crew_chief())
            .filter_map(|a| a.worker_id.clone())
            .collect();
        Self {
            company_id,
            crew_chief_ids,
        }
    }
}

/// Single authorization predicate shared by the mutating operations and
/// [`available_actions`]; the advertised actions can never be looser than
/// what the mutations enforce.
pub fn stage_authorized(actor: &User, stage: ApprovalStage, ctx: &ApprovalContext) -> bool {
    match stage {
        ApprovalStage::Company => {
            actor.is_admin()
                || actor.belongs_to_company(&ctx.company_id)
                || ctx.crew_chief_ids.iter().any(|id| *id == actor.id)
        }
        ApprovalStage::Manager => actor.is_admin(),
    }
}

/// What an approval will do once executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedApproval {
    pub stage: ApprovalStage,
    pub next_status: TimesheetStatus,
    pub pdf_variant: PdfVariant,
}

/// Validates an approval request against the current timesheet state.
///
/// Check order matches the failure contract: state first, then actor,
/// then payload.
pub fn plan_approval(
    timesheet: &Timesheet,
    actor: &User,
    stage: ApprovalStage,
    signature: &str,
    ctx: &ApprovalContext,
) -> Result<PlannedApproval, ApprovalError> {
    let pending = timesheet.pending_stage().ok_or_else(|| {
        ApprovalError::InvalidState(format!(
            "timesheet is {} and not awaiting approval",
            timesheet.status.db_value()
        ))
    })?;
    if pending != stage {
        return Err(ApprovalError::InvalidState(format!(
            "timesheet is awaiting {} approval, not {}",
            pending.as_str(),
            stage.as_str()
        )));
    }
    if !stage_authorized(actor, stage, ctx) {
        return Err(ApprovalError::Unauthorized(format!(
            "actor may not approve at the {} stage",
            stage.as_str()
        )));
    }
    rules::validate_signature(signature)
        .map_err(|_| ApprovalError::Validation("signature is required".to_string()))?;

    Ok(match stage {
        ApprovalStage::Company => PlannedApproval {
            stage,
            next_status: TimesheetStatus::PendingManagerApproval,
            pdf_variant: PdfVariant::Signed,
        },
        ApprovalStage::Manager => PlannedApproval {
            stage,
            next_status: TimesheetStatus::Completed,
            pdf_variant: PdfVariant::Final,
        },
    })
}

/// Validates a rejection request; returns the status the guarded UPDATE
/// must pin.
pub fn plan_rejection(
    timesheet: &Timesheet,
    actor: &User,
    reason: &str,
    ctx: &ApprovalContext,
) -> Result<TimesheetStatus, ApprovalError> {
    let pending = timesheet.pending_stage().ok_or_else(|| {
        ApprovalError::InvalidState(format!(
            "timesheet is {} and cannot be rejected",
            timesheet.status.db_value()
        ))
    })?;
    if !stage_authorized(actor, pending, ctx) {
        return Err(ApprovalError::Unauthorized(format!(
            "actor may not reject at the {} stage",
            pending.as_str()
        )));
    }
    rules::validate_rejection_reason(reason)
        .map_err(|_| ApprovalError::Validation("a rejection reason is required".to_string()))?;
    Ok(timesheet.status)
}

/// The actions the actor may currently perform, derived from the same
/// predicates the mutating paths enforce.
pub fn available_actions(
    timesheet: &Timesheet,
    actor: &User,
    ctx: &ApprovalContext,
) -> Vec<ApprovalAction> {
    match timesheet.pending_stage() {
        Some(stage) if stage_authorized(actor, stage, ctx) => {
            vec![ApprovalAction::Approve, ApprovalAction::Reject]
        }
        _ => Vec::new(),
    }
}

pub(crate) async fn render_with(
    renderer: &dyn TimesheetPdfRenderer,
    document: &TimesheetDocument,
) -> Result<String, ApprovalError> {
    renderer
        .render(document)
        .await
        .map_err(ApprovalError::Dependency)
}

/// Orchestrates timesheet lifecycle transitions against the database.
#[derive(Clone)]
pub struct TimesheetApprovalService {
    pool: DbPool,
    renderer: Arc<dyn TimesheetPdfRenderer>,
}

impl TimesheetApprovalService {
    pub fn new(pool: DbPool, renderer: Arc<dyn TimesheetPdfRenderer>) -> Self {
        Self { pool, renderer }
    }

    /// Opens a draft timesheet for a shift. Permitted for an admin or a
    /// crew chief assigned to the shift; one timesheet per shift.
    pub async fn create_for_shift(
        &self,
        shift_id: &str,
        actor: &User,
        now: DateTime<Utc>,
    ) -> Result<Timesheet, ApprovalError> {
        let shift = self.fetch_shift(shift_id).await?;
        let ctx = self.load_context(&shift).await?;
        let is_crew_chief = ctx.crew_chief_ids.iter().any(|id| *id == actor.id);
        if !actor.is_admin() && !is_crew_chief {
            return Err(ApprovalError::Unauthorized(
                "only an admin or the shift's crew chief may open a timesheet".to_string(),
            ));
        }
        if repositories::timesheet::fetch_timesheet_for_shift(&self.pool, &shift.id)
            .await?
            .is_some()
        {
            return Err(ApprovalError::InvalidState(
                "shift already has a timesheet".to_string(),
            ));
        }
        let timesheet = Timesheet::new(shift.id.clone(), now);
        repositories::timesheet::insert_timesheet(&self.pool, &timesheet).await?;
        tracing::info!(timesheet_id = %timesheet.id, shift_id = %shift.id, "timesheet opened");
        Ok(timesheet)
    }

    /// draft → pending_company_approval, storing the unsigned snapshot PDF.
    pub async fn submit(
        &self,
        id: TimesheetId,
        now: DateTime<Utc>,
    ) -> Result<Timesheet, ApprovalError> {
        let timesheet = self.fetch(id).await?;
        if timesheet.status != TimesheetStatus::Draft {
            return Err(ApprovalError::InvalidState(format!(
                "only a draft timesheet can be submitted; this one is {}",
                timesheet.status.db_value()
            )));
        }

        let document = self
            .build_document(&timesheet, PdfVariant::Unsigned, None, None)
            .await?;
        let url = render_with(self.renderer.as_ref(), &document).await?;

        let mut tx = transaction::begin_transaction(&self.pool).await?;
        let rows = repositories::timesheet::mark_submitted(&mut tx, id, &url, now).await?;
        if rows == 0 {
            transaction::rollback_transaction(tx).await?;
            return Err(ApprovalError::InvalidState(
                "timesheet was submitted concurrently".to_string(),
            ));
        }
        transaction::commit_transaction(tx).await?;
        tracing::info!(timesheet_id = %id, "timesheet submitted for company approval");
        self.fetch(id).await
    }

    /// Applies one signature-gated approval. The stage PDF is rendered
    /// first; the guarded UPDATE then either wins the transition or the
    /// whole operation fails with no partial state.
    pub async fn approve(
        &self,
        id: TimesheetId,
        actor: &User,
        stage: ApprovalStage,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<Timesheet, ApprovalError> {
        let timesheet = self.fetch(id).await?;
        let shift = self.fetch_shift(&timesheet.shift_id).await?;
        let ctx = self.load_context(&shift).await?;
        let plan = plan_approval(&timesheet, actor, stage, signature, &ctx)?;

        let (company_signature, manager_signature) = match plan.stage {
            ApprovalStage::Company => (Some(signature.to_string()), None),
            ApprovalStage::Manager => (
                timesheet.company_signature.clone(),
                Some(signature.to_string()),
            ),
        };
        let document = self
            .build_document(
                &timesheet,
                plan.pdf_variant,
                company_signature,
                manager_signature,
            )
            .await?;
        let url = render_with(self.renderer.as_ref(), &document).await?;

        let mut tx = transaction::begin_transaction(&self.pool).await?;
        let rows = match plan.stage {
            ApprovalStage::Company => {
                repositories::timesheet::apply_company_approval(&mut tx, id, signature, &url, now)
                    .await?
            }
            ApprovalStage::Manager => {
                repositories::timesheet::apply_manager_approval(&mut tx, id, signature, &url, now)
                    .await?
            }
        };
        if rows == 0 {
            transaction::rollback_transaction(tx).await?;
            return Err(ApprovalError::InvalidState(
                "timesheet state changed concurrently; the approval stage is no longer pending"
                    .to_string(),
            ));
        }
        transaction::commit_transaction(tx).await?;
        tracing::info!(
            timesheet_id = %id,
            stage = plan.stage.as_str(),
            next_status = plan.next_status.db_value(),
            "timesheet approval recorded"
        );
        self.fetch(id).await
    }

    /// Either pending state → rejected (terminal). No PDF regeneration.
    pub async fn reject(
        &self,
        id: TimesheetId,
        actor: &User,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Timesheet, ApprovalError> {
        let timesheet = self.fetch(id).await?;
        let shift = self.fetch_shift(&timesheet.shift_id).await?;
        let ctx = self.load_context(&shift).await?;
        let observed_status = plan_rejection(&timesheet, actor, reason, &ctx)?;

        let mut tx = transaction::begin_transaction(&self.pool).await?;
        let rows = repositories::timesheet::apply_rejection(
            &mut tx,
            id,
            observed_status,
            reason,
            &actor.id,
            now,
        )
        .await?;
        if rows == 0 {
            transaction::rollback_transaction(tx).await?;
            return Err(ApprovalError::InvalidState(
                "timesheet state changed concurrently; it can no longer be rejected".to_string(),
            ));
        }
        transaction::commit_transaction(tx).await?;
        tracing::info!(timesheet_id = %id, "timesheet rejected");
        self.fetch(id).await
    }

    /// Read-only: the actions the actor may currently perform on the
    /// timesheet.
    pub async fn actions_for(
        &self,
        id: TimesheetId,
        actor: &User,
    ) -> Result<Vec<ApprovalAction>, ApprovalError> {
        let timesheet = self.fetch(id).await?;
        if timesheet.pending_stage().is_none() {
            return Ok(Vec::new());
        }
        let shift = self.fetch_shift(&timesheet.shift_id).await?;
        let ctx = self.load_context(&shift).await?;
        Ok(available_actions(&timesheet, actor, &ctx))
    }

    pub async fn fetch(&self, id: TimesheetId) -> Result<Timesheet, ApprovalError> {
        repositories::timesheet::fetch_timesheet(&self.pool, id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound("timesheet not found".to_string()))
    }

    async fn fetch_shift(&self, shift_id: &str) -> Result<Shift, ApprovalError> {
        repositories::shift::fetch_shift_by_raw_id(&self.pool, shift_id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound("shift not found".to_string()))
    }

    async fn load_context(&self, shift: &Shift) -> Result<ApprovalContext, ApprovalError> {
        let job = repositories::job::fetch_job_by_raw_id(&self.pool, &shift.job_id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound("job not found for shift".to_string()))?;
        let assignments =
            repositories::assignment::list_assignments_for_shift_raw(&self.pool, &shift.id)
                .await?;
        Ok(ApprovalContext::new(job.company_id, &assignments))
    }

    async fn build_document(
        &self,
        timesheet: &Timesheet,
        variant: PdfVariant,
        company_signature: Option<String>,
        manager_signature: Option<String>,
    ) -> Result<TimesheetDocument, ApprovalError> {
        let shift = self.fetch_shift(&timesheet.shift_id).await?;
        let job = repositories::job::fetch_job_by_raw_id(&self.pool, &shift.job_id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound("job not found for shift".to_string()))?;
        let company = repositories::company::fetch_company_by_raw_id(&self.pool, &job.company_id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound("company not found for job".to_string()))?;
        let worked = repositories::time_entry::worked_hours_for_shift(&self.pool, &shift.id).await?;

        let lines = worked
            .into_iter()
            .map(|row| WorkerLine {
                worker_name: row.full_name,
                role: row.role_code,
                hours: row.worked_seconds / 3600.0,
            })
            .collect();

        Ok(TimesheetDocument {
            timesheet_id: timesheet.id.clone(),
            variant,
            company_name: company.name,
            job_name: job.name,
            shift_date: shift.date,
            lines,
            company_signature,
            manager_signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment::AssignmentStatus;
    use crate::models::shift::RoleCode;
    use crate::models::user::UserRole;
    use crate::services::pdf::MockTimesheetPdfRenderer;
    use chrono::NaiveDate;

    fn user(id: &str, role: UserRole, company_id: Option<&str>) -> User {
        let mut u = User::new("Test User".into(), role, company_id.map(str::to_owned), Utc::now());
        u.id = id.to_string();
        u
    }

    fn admin() -> User {
        user("admin-1", UserRole::Admin, None)
    }

    fn company_user() -> User {
        user("cu-1", UserRole::CompanyUser, Some("co-1"))
    }

    fn crew_chief() -> User {
        user("cc-1", UserRole::Staff, None)
    }

    fn plain_staff() -> User {
        user("staff-1", UserRole::Staff, None)
    }

    fn ctx_with_crew_chief() -> ApprovalContext {
        let mut assignment = ShiftAssignment::new(
            "shift-1".into(),
            Some("cc-1".into()),
            RoleCode::CrewChief,
            Utc::now(),
        );
        assignment.status = AssignmentStatus::ClockedIn;
        ApprovalContext::new("co-1".into(), &[assignment])
    }

    fn timesheet_in(status: TimesheetStatus) -> Timesheet {
        let mut ts = Timesheet::new("shift-1".into(), Utc::now());
        ts.status = status;
        if matches!(
            status,
            TimesheetStatus::PendingManagerApproval | TimesheetStatus::Completed
        ) {
            ts.company_signature = Some("sig".into());
            ts.company_approved_at = Some(Utc::now());
        }
        ts
    }

    #[test]
    fn withdrawn_crew_chief_loses_approval_standing() {
        let mut assignment = ShiftAssignment::new(
            "shift-1".into(),
            Some("cc-1".into()),
            RoleCode::CrewChief,
            Utc::now(),
        );
        assignment.status = AssignmentStatus::Withdrawn;
        let ctx = ApprovalContext::new("co-1".into(), &[assignment]);
        assert!(ctx.crew_chief_ids.is_empty());
    }

    #[test]
    fn draft_cannot_be_approved_directly() {
        let ts = timesheet_in(TimesheetStatus::Draft);
        let result = plan_approval(&ts, &admin(), ApprovalStage::Company, "sig", &ctx_with_crew_chief());
        assert!(matches!(result, Err(ApprovalError::InvalidState(_))));
    }

    #[test]
    fn stage_mismatch_is_an_invalid_state() {
        let ts = timesheet_in(TimesheetStatus::PendingCompanyApproval);
        let result = plan_approval(&ts, &admin(), ApprovalStage::Manager, "sig", &ctx_with_crew_chief());
        assert!(matches!(result, Err(ApprovalError::InvalidState(_))));
    }

    #[test]
    fn company_stage_accepts_admin_company_user_and_crew_chief() {
        let ts = timesheet_in(TimesheetStatus::PendingCompanyApproval);
        let ctx = ctx_with_crew_chief();
        for actor in [admin(), company_user(), crew_chief()] {
            let plan = plan_approval(&ts, &actor, ApprovalStage::Company, "sig", &ctx)
                .expect("actor should be authorized");
            assert_eq!(plan.next_status, TimesheetStatus::PendingManagerApproval);
            assert_eq!(plan.pdf_variant, PdfVariant::Signed);
        }
    }

    #[test]
    fn company_stage_rejects_unrelated_actors() {
        let ts = timesheet_in(TimesheetStatus::PendingCompanyApproval);
        let ctx = ctx_with_crew_chief();

        let result = plan_approval(&ts, &plain_staff(), ApprovalStage::Company, "sig", &ctx);
        assert!(matches!(result, Err(ApprovalError::Unauthorized(_))));

        // Company user from a different company.
        let other = user("cu-2", UserRole::CompanyUser, Some("co-9"));
        let result = plan_approval(&ts, &other, ApprovalStage::Company, "sig", &ctx);
        assert!(matches!(result, Err(ApprovalError::Unauthorized(_))));
    }

    #[test]
    fn manager_stage_is_admin_only() {
        let ts = timesheet_in(TimesheetStatus::PendingManagerApproval);
        let ctx = ctx_with_crew_chief();

        let plan = plan_approval(&ts, &admin(), ApprovalStage::Manager, "sig", &ctx).unwrap();
        assert_eq!(plan.next_status, TimesheetStatus::Completed);
        assert_eq!(plan.pdf_variant, PdfVariant::Final);

        // The crew chief who signed at the company stage cannot act here.
        for actor in [crew_chief(), company_user()] {
            let result = plan_approval(&ts, &actor, ApprovalStage::Manager, "sig", &ctx);
            assert!(matches!(result, Err(ApprovalError::Unauthorized(_))));
        }
    }

    #[test]
    fn missing_signature_is_a_validation_error() {
        let ts = timesheet_in(TimesheetStatus::PendingCompanyApproval);
        let result = plan_approval(&ts, &admin(), ApprovalStage::Company, "  ", &ctx_with_crew_chief());
        assert!(matches!(result, Err(ApprovalError::Validation(_))));
    }

    #[test]
    fn terminal_timesheets_accept_no_operations() {
        let ctx = ctx_with_crew_chief();
        for status in [TimesheetStatus::Completed, TimesheetStatus::Rejected] {
            let ts = timesheet_in(status);
            assert!(matches!(
                plan_approval(&ts, &admin(), ApprovalStage::Company, "sig", &ctx),
                Err(ApprovalError::InvalidState(_))
            ));
            assert!(matches!(
                plan_rejection(&ts, &admin(), "reason", &ctx),
                Err(ApprovalError::InvalidState(_))
            ));
            assert!(available_actions(&ts, &admin(), &ctx).is_empty());
        }
    }

    #[test]
    fn rejection_requires_a_reason_and_stage_authorization() {
        let ctx = ctx_with_crew_chief();
        let ts = timesheet_in(TimesheetStatus::PendingCompanyApproval);

        assert!(matches!(
            plan_rejection(&ts, &admin(), "", &ctx),
            Err(ApprovalError::Validation(_))
        ));
        assert!(matches!(
            plan_rejection(&ts, &plain_staff(), "bad hours", &ctx),
            Err(ApprovalError::Unauthorized(_))
        ));
        assert_eq!(
            plan_rejection(&ts, &crew_chief(), "bad hours", &ctx).unwrap(),
            TimesheetStatus::PendingCompanyApproval
        );

        // At the manager stage only an admin can reject.
        let ts = timesheet_in(TimesheetStatus::PendingManagerApproval);
        assert!(matches!(
            plan_rejection(&ts, &crew_chief(), "bad hours", &ctx),
            Err(ApprovalError::Unauthorized(_))
        ));
        assert_eq!(
            plan_rejection(&ts, &admin(), "bad hours", &ctx).unwrap(),
            TimesheetStatus::PendingManagerApproval
        );
    }

    #[test]
    fn available_actions_match_the_enforced_predicates() {
        let ctx = ctx_with_crew_chief();
        let statuses = [
            TimesheetStatus::Draft,
            TimesheetStatus::PendingCompanyApproval,
            TimesheetStatus::PendingManagerApproval,
            TimesheetStatus::Completed,
            TimesheetStatus::Rejected,
        ];
        let actors = [admin(), company_user(), crew_chief(), plain_staff()];
        for status in statuses {
            let ts = timesheet_in(status);
            for actor in &actors {
                let advertised = available_actions(&ts, actor, &ctx);
                let approve_ok = ts
                    .pending_stage()
                    .map(|stage| plan_approval(&ts, actor, stage, "sig", &ctx).is_ok())
                    .unwrap_or(false);
                assert_eq!(
                    advertised.contains(&ApprovalAction::Approve),
                    approve_ok,
                    "advertised actions diverge for {:?}/{}",
                    status,
                    actor.id
                );
                let reject_ok = plan_rejection(&ts, actor, "reason", &ctx).is_ok();
                assert_eq!(advertised.contains(&ApprovalAction::Reject), reject_ok);
            }
        }
    }

    #[tokio::test]
    async fn renderer_failure_surfaces_as_dependency_error() {
        let mut renderer = MockTimesheetPdfRenderer::new();
        renderer.expect_render().returning(|_| {
            Err(PdfRenderError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        });
        let document = TimesheetDocument {
            timesheet_id: "ts-1".into(),
            variant: PdfVariant::Unsigned,
            company_name: "Acme".into(),
            job_name: "Load-in".into(),
            shift_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            lines: Vec::new(),
            company_signature: None,
            manager_signature: None,
        };
        let result = render_with(&renderer, &document).await;
        assert!(matches!(result, Err(ApprovalError::Dependency(_))));
    }
}
