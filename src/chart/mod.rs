//! The chart data for a month: a price histogram and a breakdown by category.

mod category;
mod price_range;

pub use category::{CategoryCount, get_category_breakdown, get_pie_chart_endpoint};
pub use price_range::{PriceBucket, get_bar_chart_endpoint, get_price_histogram};
