//! Equipment dataset pipeline.
//!
//! Ties ingestion, aggregation, scoping and storage together behind
//! [`EquipmentService`]:
//!
//! ```text
//! bytes -> parse -> aggregate -> DatasetStore::save(scope, ..) -> evict
//! ```
//!
//! - [`aggregate`]: count, means and type distribution of validated records
//! - [`scope`]: credential to history scope resolution
//! - [`config`]: TOML application configuration
//! - [`service`]: the request-level operations

pub mod aggregate;
pub mod config;
pub mod scope;
pub mod service;

pub use aggregate::aggregate;
pub use config::{AppConfig, AuthConfig, CONFIG_FILE_NAME, ConfigError, DEFAULT_MAX_UPLOAD_BYTES};
pub use scope::{Credential, CredentialProvider, ScopeError, ScopeResolver, StaticTokenProvider};
pub use service::{EquipmentService, Result, ServiceError};
