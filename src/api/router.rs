//! Application router.
//!
//! Returns a composable `Router` mounting every route of the tracker.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::service::RecordService;

/// Build the application router over a shared record service.
pub fn app_router(service: Arc<RecordService>) -> Router {
    let ctx = ApiContext::new(service);

    Router::new()
        .route("/", get(endpoints::patients::list))
        .route("/patient/:id", get(endpoints::patients::detail))
        .route(
            "/add_patient",
            get(endpoints::patients::form).post(endpoints::patients::create),
        )
        .route(
            "/add_followup/:patient_id",
            get(endpoints::followups::form).post(endpoints::followups::create),
        )
        .route("/download_patients", get(endpoints::downloads::patients))
        .route("/download_followups", get(endpoints::downloads::followups))
        .with_state(ctx)
}
