use crate::{config::Config, db::connection::DbPool, services::approval::TimesheetApprovalService};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub approvals: TimesheetApprovalService,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, approvals: TimesheetApprovalService) -> Self {
        Self {
            pool,
            config,
            approvals,
        }
    }
}
