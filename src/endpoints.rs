//! The URIs of the dashboard pages and the JSON API.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page for browsing a month's sales.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// The prefix shared by every JSON route.
pub const API_PREFIX: &str = "/api";
/// The route for listing a month's transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for a month's sale totals.
pub const STATISTICS_API: &str = "/api/statistics";
/// The route for a month's price histogram.
pub const BAR_CHART_API: &str = "/api/bar-chart";
/// The route for a month's category breakdown.
pub const PIE_CHART_API: &str = "/api/pie-chart";
/// The route for the listing, totals and chart data of a month in one response.
pub const COMBINED_API: &str = "/api/combined";
/// The route for replacing the stored transactions with the product feed.
pub const SEED_API: &str = "/api/seed";
