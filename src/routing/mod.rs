//! Destination routing.
//!
//! The proxied URL is the inbound path and query with the leading `/`
//! removed. There is no route table: every request targets the URL it
//! carries.

pub mod target;

pub use target::{extract_destination, parse_absolute_url, InvalidUrl};
