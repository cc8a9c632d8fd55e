//! Client for the container registry management API
//!
//! [`ContainerRegistryClient`] turns each API operation into a request,
//! authenticates it with an [`Authenticator`], sends it through a
//! [`Transport`] and decodes the JSON answer into the typed models.

pub mod auth;
pub mod client;
pub mod operations;
pub mod request;
pub mod response;
pub mod token_manager;
pub mod transport;

pub use auth::{
    Authenticator, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator,
};
pub use client::{ContainerRegistryClient, ContainerRegistryClientBuilder};
pub use operations::*;
pub use request::{ServiceRequest, encode_path_segment};
pub use response::DetailedResponse;
pub use transport::{HttpTransport, RawResponse, RetryConfig, Transport};
