#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    handlers::{AvailableActionsResponse, WorkedHoursResponse},
    models::{
        assignment::{AssignmentResponse, CreateAssignmentRequest, UpdateAssignmentStatusRequest},
        company::{CompanyResponse, CreateCompany},
        job::{CreateJob, JobResponse},
        shift::{CreateShiftRequest, RoleCode, RoleRequirements, ShiftResponse, ShiftStatus},
        time_entry::{ClockOutRequest, TimeEntryResponse},
        timesheet::{
            ApprovalStage, ApproveTimesheetRequest, RejectTimesheetRequest, TimesheetResponse,
            TimesheetStatus,
        },
        user::{CreateUser, UserResponse, UserRole},
    },
    services::approval::ApprovalAction,
    services::staffing::{FulfillmentBand, RoleShortage, StaffingSummary},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_company_doc,
        create_job_doc,
        create_shift_doc,
        shift_staffing_doc,
        create_assignment_doc,
        clock_in_doc,
        clock_out_doc,
        create_timesheet_doc,
        submit_timesheet_doc,
        approve_timesheet_doc,
        reject_timesheet_doc,
        timesheet_actions_doc,
    ),
    components(schemas(
        CreateCompany,
        CompanyResponse,
        CreateJob,
        JobResponse,
        CreateShiftRequest,
        ShiftResponse,
        ShiftStatus,
        RoleCode,
        RoleRequirements,
        CreateAssignmentRequest,
        UpdateAssignmentStatusRequest,
        AssignmentResponse,
        ClockOutRequest,
        TimeEntryResponse,
        WorkedHoursResponse,
        ApproveTimesheetRequest,
        RejectTimesheetRequest,
        TimesheetResponse,
        TimesheetStatus,
        ApprovalStage,
        ApprovalAction,
        AvailableActionsResponse,
        StaffingSummary,
        FulfillmentBand,
        RoleShortage,
        CreateUser,
        UserResponse,
        UserRole,
    )),
    tags(
        (name = "shifts", description = "Shift scheduling and staffing"),
        (name = "assignments", description = "Worker assignments and time entries"),
        (name = "timesheets", description = "Timesheet approval pipeline"),
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompany,
    responses((status = 200, description = "Company created", body = CompanyResponse)),
    tag = "shifts"
)]
fn create_company_doc() {}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJob,
    responses((status = 200, description = "Job created", body = JobResponse)),
    tag = "shifts"
)]
fn create_job_doc() {}

#[utoipa::path(
    post,
    path = "/api/jobs/{job_id}/shifts",
    request_body = CreateShiftRequest,
    params(("job_id" = String, Path, description = "Job id")),
    responses((status = 200, description = "Shift created", body = ShiftResponse)),
    tag = "shifts"
)]
fn create_shift_doc() {}

#[utoipa::path(
    get,
    path = "/api/shifts/{shift_id}/staffing",
    params(("shift_id" = String, Path, description = "Shift id")),
    responses((status = 200, description = "Staffing summary", body = StaffingSummary)),
    tag = "shifts"
)]
fn shift_staffing_doc() {}

#[utoipa::path(
    post,
    path = "/api/shifts/{shift_id}/assignments",
    request_body = CreateAssignmentRequest,
    params(("shift_id" = String, Path, description = "Shift id")),
    responses((status = 200, description = "Assignment created", body = AssignmentResponse)),
    tag = "assignments"
)]
fn create_assignment_doc() {}

#[utoipa::path(
    post,
    path = "/api/assignments/{assignment_id}/clock-in",
    params(("assignment_id" = String, Path, description = "Assignment id")),
    responses((status = 200, description = "Time entry opened", body = TimeEntryResponse)),
    tag = "assignments"
)]
fn clock_in_doc() {}

#[utoipa::path(
    post,
    path = "/api/assignments/{assignment_id}/clock-out",
    request_body = ClockOutRequest,
    params(("assignment_id" = String, Path, description = "Assignment id")),
    responses((status = 200, description = "Time entry closed", body = [TimeEntryResponse])),
    tag = "assignments"
)]
fn clock_out_doc() {}

#[utoipa::path(
    post,
    path = "/api/shifts/{shift_id}/timesheet",
    params(("shift_id" = String, Path, description = "Shift id")),
    responses((status = 200, description = "Draft timesheet opened", body = TimesheetResponse)),
    tag = "timesheets"
)]
fn create_timesheet_doc() {}

#[utoipa::path(
    post,
    path = "/api/timesheets/{timesheet_id}/submit",
    params(("timesheet_id" = String, Path, description = "Timesheet id")),
    responses((status = 200, description = "Submitted for company approval", body = TimesheetResponse)),
    tag = "timesheets"
)]
fn submit_timesheet_doc() {}

#[utoipa::path(
    post,
    path = "/api/timesheets/{timesheet_id}/approve",
    request_body = ApproveTimesheetRequest,
    params(("timesheet_id" = String, Path, description = "Timesheet id")),
    responses(
        (status = 200, description = "Approval recorded", body = TimesheetResponse),
        (status = 403, description = "Actor not allowed at this stage"),
        (status = 409, description = "Timesheet not awaiting this stage"),
        (status = 503, description = "PDF generation failed; retry safely"),
    ),
    tag = "timesheets"
)]
fn approve_timesheet_doc() {}

#[utoipa::path(
    post,
    path = "/api/timesheets/{timesheet_id}/reject",
    request_body = RejectTimesheetRequest,
    params(("timesheet_id" = String, Path, description = "Timesheet id")),
    responses((status = 200, description = "Timesheet rejected", body = TimesheetResponse)),
    tag = "timesheets"
)]
fn reject_timesheet_doc() {}

#[utoipa::path(
    get,
    path = "/api/timesheets/{timesheet_id}/actions",
    params(("timesheet_id" = String, Path, description = "Timesheet id")),
    responses((status = 200, description = "Actions the caller may perform", body = AvailableActionsResponse)),
    tag = "timesheets"
)]
fn timesheet_actions_doc() {}
