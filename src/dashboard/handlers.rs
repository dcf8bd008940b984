//! HTTP handlers for the dashboard page.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use serde::Deserialize;
use time::Month;

use crate::{
    Error,
    app_state::QueryState,
    combined::{CombinedData, get_combined},
    html::{ECHARTS_URL, HeadElement, PAGE_CONTAINER_STYLE, base},
    pagination::create_pagination_indicators,
    query_params::{ListingParams, parse_month, parse_page},
};

use super::{
    charts::{build_dashboard_charts, charts_script, charts_view},
    controls::{CONTENT_ID, filter_form, pagination_nav},
    tables::{statistics_cards, transactions_table},
};

/// The query string for the dashboard page.
///
/// All fields are optional, `month` defaults to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQueryParams {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

/// Everything needed to render the dashboard for one month.
struct DashboardData {
    month: Month,
    search: String,
    max_pages: u64,
    combined: CombinedData,
}

/// Display the sales dashboard for a month.
///
/// htmx requests, e.g. from changing the month or typing in the search box,
/// get only the dashboard content. Other requests get the full page.
pub async fn get_dashboard_page(
    State(state): State<QueryState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(params): Query<DashboardQueryParams>,
) -> Response {
    let data = match get_dashboard_data(&state, params).await {
        Ok(data) => data,
        Err(error) => return error.into_html_response(),
    };

    if is_htmx_request {
        dashboard_content(&data).into_response()
    } else {
        dashboard_view(&data).into_response()
    }
}

async fn get_dashboard_data(
    state: &QueryState,
    params: DashboardQueryParams,
) -> Result<DashboardData, Error> {
    let month = match params.month.as_deref().filter(|month| !month.trim().is_empty()) {
        Some(month) => parse_month(Some(month))?,
        None => state.today()?.month(),
    };
    let search = params.search.unwrap_or_default();
    let page = parse_page(params.page.as_deref(), &state.pagination_config)?;

    let query = state.listing_query(ListingParams {
        month,
        search: search.clone(),
        page,
        per_page: state.pagination_config.default_page_size,
    })?;

    let combined = get_combined(state.db_connection.clone(), query)
        .await
        .inspect_err(|error| tracing::error!("Could not get dashboard data: {error}"))?;

    Ok(DashboardData {
        month,
        search,
        max_pages: state.pagination_config.max_pages,
        combined,
    })
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h1 class="text-2xl font-bold mb-4" { "Sales Dashboard" }

                (filter_form(data.month, &data.search))
                (dashboard_content(data))
            }
        }
    };

    base(
        "Dashboard",
        &[HeadElement::ScriptLink(ECHARTS_URL.to_owned())],
        &content,
    )
}

/// The part of the dashboard that changes with the month, search and page.
fn dashboard_content(data: &DashboardData) -> Markup {
    let transactions = &data.combined.transactions;
    let indicators =
        create_pagination_indicators(transactions.page, transactions.pages, data.max_pages);
    let charts = build_dashboard_charts(
        data.month,
        &data.combined.bar_chart_data,
        &data.combined.pie_chart_data,
    );

    html! {
        div id=(CONTENT_ID) class="w-full"
        {
            (statistics_cards(&data.combined.statistics))

            h2 class="text-xl font-semibold my-4"
            {
                "Transactions in " (data.month)
                span class="ml-2 text-sm font-normal text-gray-500" { "(" (transactions.total) " found)" }
            }

            (transactions_table(&transactions.transactions))
            (pagination_nav(&indicators, data.month, &data.search))
            (charts_view(&charts))
            (charts_script(&charts))
        }
    }
}
