//! Request extractors: bearer-token caller identity, validated JSON bodies
//! and query parameters.

pub mod auth;
pub mod json;
pub mod query;
