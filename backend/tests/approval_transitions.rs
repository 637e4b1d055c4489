//! Transition-matrix coverage for the timesheet approval state machine's
//! planning layer: which actor can move which timesheet where.

use chrono::Utc;
use crewcall_backend::models::assignment::{AssignmentStatus, ShiftAssignment};
use crewcall_backend::models::shift::RoleCode;
use crewcall_backend::models::timesheet::{ApprovalStage, Timesheet, TimesheetStatus};
use crewcall_backend::models::user::{User, UserRole};
use crewcall_backend::services::approval::{
    available_actions, plan_approval, plan_rejection, ApprovalAction, ApprovalContext,
    ApprovalError,
};
use crewcall_backend::services::pdf::PdfVariant;

fn user(id: &str, role: UserRole, company_id: Option<&str>) -> User {
    let mut u = User::new(
        format!("User {}", id),
        role,
        company_id.map(str::to_owned),
        Utc::now(),
    );
    u.id = id.to_string();
    u
}

fn context() -> ApprovalContext {
    let mut chief = ShiftAssignment::new(
        "shift-1".to_string(),
        Some("chief-1".to_string()),
        RoleCode::CrewChief,
        Utc::now(),
    );
    chief.status = AssignmentStatus::ShiftEnded;
    let hand = ShiftAssignment::new(
        "shift-1".to_string(),
        Some("hand-1".to_string()),
        RoleCode::Stagehand,
        Utc::now(),
    );
    ApprovalContext::new("co-1".to_string(), &[chief, hand])
}

fn timesheet(status: TimesheetStatus) -> Timesheet {
    let mut ts = Timesheet::new("shift-1".to_string(), Utc::now());
    ts.status = status;
    if matches!(
        status,
        TimesheetStatus::PendingManagerApproval | TimesheetStatus::Completed
    ) {
        ts.company_signature = Some("company-sig".to_string());
        ts.company_approved_at = Some(Utc::now());
    }
    ts
}

#[test]
fn happy_path_company_then_manager() {
    let ctx = context();
    let chief = user("chief-1", UserRole::Staff, None);
    let admin = user("admin-1", UserRole::Admin, None);

    // Crew chief signs at the company stage.
    let ts = timesheet(TimesheetStatus::PendingCompanyApproval);
    let plan = plan_approval(&ts, &chief, ApprovalStage::Company, "sig-a", &ctx).unwrap();
    assert_eq!(plan.next_status, TimesheetStatus::PendingManagerApproval);
    assert_eq!(plan.pdf_variant, PdfVariant::Signed);

    // The same crew chief cannot act at the manager stage.
    let ts = timesheet(TimesheetStatus::PendingManagerApproval);
    let denied = plan_approval(&ts, &chief, ApprovalStage::Manager, "sig-b", &ctx);
    assert!(matches!(denied, Err(ApprovalError::Unauthorized(_))));

    // An admin closes it out.
    let plan = plan_approval(&ts, &admin, ApprovalStage::Manager, "sig-b", &ctx).unwrap();
    assert_eq!(plan.next_status, TimesheetStatus::Completed);
    assert_eq!(plan.pdf_variant, PdfVariant::Final);
}

#[test]
fn every_state_either_plans_a_transition_or_fails_with_a_defined_error() {
    let ctx = context();
    let admin = user("admin-1", UserRole::Admin, None);
    let statuses = [
        TimesheetStatus::Draft,
        TimesheetStatus::PendingCompanyApproval,
        TimesheetStatus::PendingManagerApproval,
        TimesheetStatus::Completed,
        TimesheetStatus::Rejected,
    ];
    for status in statuses {
        let ts = timesheet(status);
        for stage in [ApprovalStage::Company, ApprovalStage::Manager] {
            match plan_approval(&ts, &admin, stage, "sig", &ctx) {
                Ok(plan) => {
                    // A successful plan always advances the status.
                    assert_ne!(plan.next_status, status);
                    assert_eq!(ts.pending_stage(), Some(stage));
                }
                Err(
                    ApprovalError::InvalidState(_)
                    | ApprovalError::Unauthorized(_)
                    | ApprovalError::Validation(_),
                ) => {}
                Err(other) => panic!("unexpected error class: {:?}", other),
            }
        }
    }
}

#[test]
fn rejection_is_reachable_from_both_pending_states_only() {
    let ctx = context();
    let admin = user("admin-1", UserRole::Admin, None);

    for status in [
        TimesheetStatus::PendingCompanyApproval,
        TimesheetStatus::PendingManagerApproval,
    ] {
        let ts = timesheet(status);
        assert_eq!(
            plan_rejection(&ts, &admin, "hours disputed", &ctx).unwrap(),
            status
        );
    }
    for status in [
        TimesheetStatus::Draft,
        TimesheetStatus::Completed,
        TimesheetStatus::Rejected,
    ] {
        let ts = timesheet(status);
        assert!(matches!(
            plan_rejection(&ts, &admin, "hours disputed", &ctx),
            Err(ApprovalError::InvalidState(_))
        ));
    }
}

#[test]
fn company_stage_authorization_matrix() {
    let ctx = context();
    let ts = timesheet(TimesheetStatus::PendingCompanyApproval);

    let allowed = [
        user("admin-1", UserRole::Admin, None),
        user("cu-1", UserRole::CompanyUser, Some("co-1")),
        user("chief-1", UserRole::Staff, None),
    ];
    for actor in &allowed {
        assert!(
            plan_approval(&ts, actor, ApprovalStage::Company, "sig", &ctx).is_ok(),
            "{} should be allowed",
            actor.id
        );
    }

    let denied = [
        // Ordinary stagehand on the shift.
        user("hand-1", UserRole::Staff, None),
        // Company user from another company.
        user("cu-2", UserRole::CompanyUser, Some("co-2")),
        // Staff member with no assignment.
        user("random", UserRole::Staff, None),
    ];
    for actor in &denied {
        assert!(
            matches!(
                plan_approval(&ts, actor, ApprovalStage::Company, "sig", &ctx),
                Err(ApprovalError::Unauthorized(_))
            ),
            "{} should be denied",
            actor.id
        );
    }
}

#[test]
fn advertised_actions_never_exceed_enforceable_ones() {
    let ctx = context();
    let actors = [
        user("admin-1", UserRole::Admin, None),
        user("cu-1", UserRole::CompanyUser, Some("co-1")),
        user("chief-1", UserRole::Staff, None),
        user("hand-1", UserRole::Staff, None),
    ];
    let statuses = [
        TimesheetStatus::Draft,
        TimesheetStatus::PendingCompanyApproval,
        TimesheetStatus::PendingManagerApproval,
        TimesheetStatus::Completed,
        TimesheetStatus::Rejected,
    ];
    for status in statuses {
        let ts = timesheet(status);
        for actor in &actors {
            let actions = available_actions(&ts, actor, &ctx);
            if actions.contains(&ApprovalAction::Approve) {
                let stage = ts.pending_stage().expect("approve advertised without stage");
                assert!(plan_approval(&ts, actor, stage, "sig", &ctx).is_ok());
            }
            if actions.contains(&ApprovalAction::Reject) {
                assert!(plan_rejection(&ts, actor, "reason", &ctx).is_ok());
            }
        }
    }
}

#[test]
fn draft_approval_requires_submission_first() {
    let ctx = context();
    let admin = user("admin-1", UserRole::Admin, None);
    let ts = timesheet(TimesheetStatus::Draft);
    let result = plan_approval(&ts, &admin, ApprovalStage::Company, "sig", &ctx);
    assert!(matches!(result, Err(ApprovalError::InvalidState(_))));
}
