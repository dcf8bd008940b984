//! Dashboard module
//!
//! Provides an overview page of a month's sales: totals, a searchable table of
//! transactions and charts of price ranges and categories.

mod charts;
mod controls;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
