//! Request extractors whose rejections render as JSON error bodies.

pub mod json;
pub mod query;

pub use json::ApiJson;
pub use query::ApiQuery;
