//! Request and response bodies for the gateway's JSON endpoints.

pub mod request;
pub mod response;
