//! Request builder module
//!
//! Turns the fetch configuration and the current cursor into a complete
//! request descriptor: POST to the configured endpoint, Matomo query
//! parameters, and a form body carrying `token_auth`.

mod builder;

pub use builder::{RequestBuilder, RequestDescriptor, API_MODULE, FORM_CONTENT_TYPE, TOKEN_FIELD};
