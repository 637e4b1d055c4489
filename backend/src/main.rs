use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crewcall_backend::{
    config::Config,
    db::connection::create_pool,
    docs,
    handlers,
    middleware as identity_middleware,
    services::approval::TimesheetApprovalService,
    services::pdf::FilePdfRenderer,
    state::AppState,
};

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewcall_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        bind_address = %config.bind_address,
        time_zone = %config.time_zone,
        min_crew_chiefs = config.min_crew_chiefs,
        pdf_output_dir = %config.pdf_output_dir.display(),
        "Loaded configuration from environment/.env"
    );

    // Initialize database
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(pool.as_ref()).await?;

    let renderer = Arc::new(FilePdfRenderer::new(config.pdf_output_dir.clone()));
    let approvals = TimesheetApprovalService::new(pool.clone(), renderer);
    let state = AppState::new(pool, config.clone(), approvals);

    // All /api routes require a resolved actor identity.
    let api_routes = Router::new()
        .route("/api/users", post(handlers::users::create_user))
        .route("/api/users/{user_id}", get(handlers::users::get_user))
        .route("/api/companies", post(handlers::companies::create_company))
        .route(
            "/api/companies/{company_id}",
            get(handlers::companies::get_company),
        )
        .route("/api/jobs", post(handlers::jobs::create_job))
        .route("/api/jobs/{job_id}", get(handlers::jobs::get_job))
        .route(
            "/api/jobs/{job_id}/shifts",
            post(handlers::shifts::create_shift),
        )
        .route("/api/shifts", get(handlers::shifts::list_shifts))
        .route("/api/shifts/{shift_id}", get(handlers::shifts::get_shift))
        .route(
            "/api/shifts/{shift_id}/staffing",
            get(handlers::shifts::get_shift_staffing),
        )
        .route(
            "/api/shifts/{shift_id}/assignments",
            post(handlers::assignments::create_assignment)
                .get(handlers::assignments::list_assignments),
        )
        .route(
            "/api/assignments/{assignment_id}/status",
            patch(handlers::assignments::update_assignment_status),
        )
        .route(
            "/api/assignments/{assignment_id}/clock-in",
            post(handlers::assignments::clock_in),
        )
        .route(
            "/api/assignments/{assignment_id}/clock-out",
            post(handlers::assignments::clock_out),
        )
        .route(
            "/api/assignments/{assignment_id}/time-entries",
            get(handlers::assignments::list_time_entries),
        )
        .route(
            "/api/shifts/{shift_id}/timesheet",
            post(handlers::timesheets::create_timesheet),
        )
        .route(
            "/api/timesheets/{timesheet_id}",
            get(handlers::timesheets::get_timesheet),
        )
        .route(
            "/api/timesheets/{timesheet_id}/submit",
            post(handlers::timesheets::submit_timesheet),
        )
        .route(
            "/api/timesheets/{timesheet_id}/approve",
            post(handlers::timesheets::approve_timesheet),
        )
        .route(
            "/api/timesheets/{timesheet_id}/reject",
            post(handlers::timesheets::reject_timesheet),
        )
        .route(
            "/api/timesheets/{timesheet_id}/actions",
            get(handlers::timesheets::get_available_actions),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            identity_middleware::identity,
        ));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let app = Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %config.bind_address, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
