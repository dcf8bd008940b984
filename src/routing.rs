//! Application router configuration.

use axum::{Router, response::Redirect, routing::get};

use crate::{
    AppState,
    chart::{get_bar_chart_endpoint, get_pie_chart_endpoint},
    combined::get_combined_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    seed::seed_endpoint,
    statistics::get_statistics_endpoint,
    transaction::get_transactions_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(endpoints::TRANSACTIONS_API, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS_API, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART_API, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART_API, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_API, get(get_combined_endpoint))
        .route(endpoints::SEED_API, get(seed_endpoint));

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page));

    view_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
