//! Outbound HTTP plumbing shared by remote backends

mod http_client;

pub use http_client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
