//! IBM Cloud Container Registry client
//!
//! Typed access to the registry management API: namespaces, images and
//! their vulnerability summaries, quotas, retention policies and the trash.
//!
//! ```no_run
//! use ibm_container_registry::{ContainerRegistryClient, IamAuthenticator, ListImagesOptions};
//!
//! # async fn run() -> ibm_container_registry::Result<()> {
//! let client = ContainerRegistryClient::builder("my-account-id")
//!     .with_region("eu-de")
//!     .with_authenticator(IamAuthenticator::new("my-api-key")?)
//!     .build()?;
//!
//! let images = client
//!     .list_images(&ListImagesOptions::new().with_namespace("birds"))
//!     .await?;
//! for image in images.result.unwrap_or_default() {
//!     println!("{:?}", image.repo_tags);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod region;
pub mod registry;

pub use config::ServiceConfig;
pub use error::{RegistryError, Result};
pub use registry::*;
