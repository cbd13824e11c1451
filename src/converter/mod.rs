//! Format converters for endpoint configuration files.

mod endpoints;

pub use endpoints::{Endpoint, EndpointConverter};
