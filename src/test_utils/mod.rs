#![allow(missing_docs)]

pub(crate) mod feed;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod state;

pub(crate) use feed::{FEED, serve_feed};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_status_ok, parse_json};
pub(crate) use state::{get_test_app_state, get_test_connection};
