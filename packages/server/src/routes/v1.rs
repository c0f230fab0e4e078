use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/resumes", resume_routes(config))
        .nest("/bills", bill_routes())
}

fn resume_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::resume::list_resumes,
            handlers::resume::create_resume
        ))
        .routes(routes!(
            handlers::resume::get_resume,
            handlers::resume::delete_resume
        ))
        .routes(routes!(handlers::resume::preview_extraction))
        .routes(routes!(handlers::resume::reextract_resume))
        .layer(handlers::resume::resume_body_limit(
            config.storage.max_upload_size,
        ))
}

fn bill_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::bill::list_bills,
            handlers::bill::create_bill
        ))
        .routes(routes!(
            handlers::bill::get_bill,
            handlers::bill::update_bill,
            handlers::bill::delete_bill
        ))
}
