//! Route definitions for the Exam Production Tracking Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public login/refresh, protected profile)
        .nest("/auth", auth_routes())
        // Protected routes - group and project lookups
        .nest("/groups", group_routes())
        .nest("/projects", project_routes())
        // Protected routes - process transactions
        .nest("/transactions", transaction_routes())
        // Protected routes - dispatches
        .nest("/dispatches", dispatch_routes())
        // Protected routes - catch status board and search
        .nest("/catches", catch_routes())
        // Protected routes - production reports
        .nest("/reports", report_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Group lookup routes (protected)
fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_groups))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Project lookup and aggregation routes (protected)
fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_projects))
        // Dashboard rollups across the user's projects
        .route("/completions", get(handlers::list_project_completions))
        // Cascade lookups
        .route("/:project_id/lots", get(handlers::get_lot_numbers))
        .route(
            "/:project_id/lots/:lot_no/catches",
            get(handlers::get_catch_numbers),
        )
        .route("/:project_id/operators", get(handlers::get_assigned_operators))
        // Completion rollups
        .route("/:project_id/completion", get(handlers::get_project_completion))
        .route(
            "/:project_id/completion/combined",
            get(handlers::get_combined_percentages),
        )
        .route(
            "/:project_id/completion/processes",
            get(handlers::get_process_percentages),
        )
        // Pipeline statistics
        .route(
            "/:project_id/lots/:lot_no/statistics",
            get(handlers::get_process_train),
        )
        .route(
            "/:project_id/lots/:lot_no/processes/:process_id/catches",
            get(handlers::get_catches_at_status),
        )
        // Status board
        .route("/:project_id/catch-status", get(handlers::get_catch_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Process transaction routes (protected)
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::save_transaction))
        .route(
            "/projects/:project_id",
            get(handlers::list_project_transactions),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dispatch routes (protected)
fn dispatch_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_dispatches).post(handlers::create_dispatch),
        )
        .route("/summary/today", get(handlers::get_today_dispatch_summary))
        .route(
            "/:id",
            get(handlers::get_dispatch)
                .put(handlers::update_dispatch)
                .delete(handlers::delete_dispatch),
        )
        .route("/projects/:project_id", get(handlers::get_project_dispatches))
        .route(
            "/projects/:project_id/lots/:lot_no",
            get(handlers::get_lot_dispatches),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Catch search routes (protected)
fn catch_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::search_catches))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Production report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/under-production", get(handlers::get_under_production))
        .route("/pending-processes", get(handlers::get_pending_processes))
        .route("/daily-production", get(handlers::get_daily_production))
        .route(
            "/daily-production/summary",
            get(handlers::get_daily_production_summary),
        )
        .route("/process-production", get(handlers::get_process_production))
        .route("/quick-completions", get(handlers::get_quick_completions))
        .route_layer(middleware::from_fn(auth_middleware))
}
