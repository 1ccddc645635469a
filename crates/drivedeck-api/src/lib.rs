//! Backend gateway for drivedeck.
//!
//! [`Gateway`] is the narrow consumed surface of the remote file service;
//! [`HttpGateway`] is its HTTP implementation. Everything here is invoked
//! from background tasks only, never from the UI loop.

mod error;
mod gateway;
mod http;

pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use http::HttpGateway;
