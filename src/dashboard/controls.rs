//! The month/search form and the page navigation for the dashboard.

use maud::{Markup, html};
use serde::Serialize;
use time::Month;

use crate::{
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    pagination::PaginationIndicator,
};

/// The ID of the element that htmx swaps when the filters change.
pub(super) const CONTENT_ID: &str = "dashboard-content";

const PAGE_LINK_STYLE: &str = "block px-3 py-2 rounded-sm text-blue-600 hover:underline";

/// The query string for one view of the dashboard.
#[derive(Debug, Serialize)]
struct DashboardQuery<'a> {
    month: u8,
    #[serde(skip_serializing_if = "str::is_empty")]
    search: &'a str,
    page: u64,
}

/// The URL of the dashboard for `month`, `search` and `page`.
pub(super) fn dashboard_url(month: Month, search: &str, page: u64) -> String {
    let query = DashboardQuery {
        month: u8::from(month),
        search,
        page,
    };

    match serde_urlencoded::to_string(&query) {
        Ok(query_string) => format!("{}?{query_string}", endpoints::DASHBOARD_VIEW),
        Err(error) => {
            tracing::error!("Could not encode the dashboard query {query:?}: {error}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

/// The month selector and search box.
///
/// The form sits outside the swapped content so that the search box keeps
/// focus while the user types.
pub(super) fn filter_form(month: Month, search: &str) -> Markup {
    let hx_target = format!("#{CONTENT_ID}");

    html! {
        form
            id="filters"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            hx-get=(endpoints::DASHBOARD_VIEW)
            hx-target=(hx_target)
            hx-swap="outerHTML"
            hx-push-url="true"
            hx-trigger="change, keyup changed delay:300ms from:#search"
            hx-indicator="#indicator"
            class="w-full grid grid-cols-1 md:grid-cols-2 gap-4 mb-4"
        {
            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                select id="month" name="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for number in 1..=12u8 {
                        @let option_month = Month::try_from(number).unwrap_or(Month::January);
                        option value=(number) selected[option_month == month] {
                            (option_month)
                        }
                    }
                }
            }

            div
            {
                label for="search" class=(FORM_LABEL_STYLE)
                {
                    "Search "
                    span id="indicator" class="htmx-indicator text-gray-500" { "(loading...)" }
                }
                input
                    id="search"
                    name="search"
                    type="search"
                    value=(search)
                    placeholder="Title, description or price"
                    autocomplete="off"
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

/// The page navigation built from `indicators`.
///
/// Each link keeps the current month and search.
pub(super) fn pagination_nav(
    indicators: &[PaginationIndicator],
    month: Month,
    search: &str,
) -> Markup {
    let hx_target = format!("#{CONTENT_ID}");
    let page_link = |page: u64, text: &str, is_button: bool| {
        let url = dashboard_url(month, search, page);

        html! {
            a
                href=(url)
                hx-get=(url)
                hx-target=(hx_target)
                hx-swap="outerHTML"
                hx-push-url="true"
                role=[is_button.then_some("button")]
                class=(PAGE_LINK_STYLE)
            { (text) }
        }
    };

    html! {
        nav class="pagination flex justify-center my-4"
        {
            ul class="pagination flex items-center gap-x-2 p-0 m-0"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => (page_link(*page, &page.to_string(), false)),
                            PaginationIndicator::CurrPage(page) => {
                                p
                                    aria-current="page"
                                    class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                { (page) }
                            },
                            PaginationIndicator::Ellipsis => {
                                span class="px-3 py-2 text-gray-500" { "..." }
                            },
                            PaginationIndicator::NextButton(page) => (page_link(*page, "Next", true)),
                            PaginationIndicator::BackButton(page) => (page_link(*page, "Back", true)),
                        }
                    }
                }
            }
        }
    }
}
