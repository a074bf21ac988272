//! Request-level operations over the dataset pipeline.
//!
//! Every call resolves the caller's scope first and never touches another
//! scope. Parsing and aggregation run before the store lock is taken, so a
//! rejected upload leaves no trace.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use equip_ingest::{IngestError, parse_equipment_csv_detailed, validate_upload_name};
use equip_model::{Dataset, DatasetId, DatasetSummary, UserId};
use equip_report::{ReportError, ReportModel, assemble_report};
use equip_store::{DatasetStore, JsonDirectoryBackend, StoreError};

use crate::aggregate::aggregate;
use crate::config::{AppConfig, ConfigError, DEFAULT_MAX_UPLOAD_BYTES};
use crate::scope::{Credential, ScopeError, ScopeResolver};

/// Error returned by [`EquipmentService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ServiceError {
    /// Caused by the request rather than by the server; retrying the same
    /// request will fail the same way.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Ingest(_) | Self::Scope(_) => true,
            Self::Store(_) | Self::Report(_) => self.is_not_found(),
            Self::Config(_) => false,
        }
    }

    /// Dataset absent from the caller's scope.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Store(error) => error.is_not_found(),
            Self::Report(error) => error.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Upload, history, detail, report and delete operations.
#[derive(Debug)]
pub struct EquipmentService {
    store: DatasetStore,
    resolver: ScopeResolver,
    max_upload_bytes: usize,
}

impl EquipmentService {
    pub fn new(store: DatasetStore, resolver: ScopeResolver) -> Self {
        Self {
            store,
            resolver,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Build a service from configuration: durable history when `data_dir`
    /// is set, tokens from `[auth.tokens]`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let resolver = ScopeResolver::new(config.token_provider()?);
        let store = match &config.data_dir {
            Some(dir) => DatasetStore::open(JsonDirectoryBackend::new(dir)?)?,
            None => {
                warn!("no data directory configured; history is kept in memory only");
                DatasetStore::in_memory()
            }
        };
        Ok(Self::new(store, resolver).with_max_upload_bytes(config.max_upload_bytes))
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Validate, aggregate and store an uploaded CSV.
    pub fn upload(
        &self,
        filename: &str,
        bytes: &[u8],
        credential: Option<&Credential>,
    ) -> Result<Arc<Dataset>> {
        let scope = self.resolver.resolve(credential);
        let span = info_span!("upload", scope = %scope, filename = %filename, bytes = bytes.len());
        let _guard = span.enter();

        validate_upload_name(filename)?;
        if bytes.len() > self.max_upload_bytes {
            return Err(IngestError::UploadTooLarge {
                size: bytes.len(),
                limit: self.max_upload_bytes,
            }
            .into());
        }

        let parsed = parse_equipment_csv_detailed(bytes).inspect_err(|error| {
            debug!(%error, "upload rejected");
        })?;
        if !parsed.rejected.is_empty() {
            info!(
                accepted = parsed.records.len(),
                rejected = parsed.rejected.len(),
                "dropped invalid rows"
            );
        }

        let aggregates = aggregate(&parsed.records);
        let dataset = self
            .store
            .save(&scope, filename, parsed.records, aggregates)?;
        info!(
            dataset_id = %dataset.id,
            total_count = dataset.aggregates.total_count,
            "upload stored"
        );
        Ok(dataset)
    }

    /// History of the caller's scope, newest first.
    pub fn history(&self, credential: Option<&Credential>) -> Vec<DatasetSummary> {
        let scope = self.resolver.resolve(credential);
        self.store.list(&scope)
    }

    /// Full dataset including its records.
    pub fn dataset(&self, id: DatasetId, credential: Option<&Credential>) -> Result<Arc<Dataset>> {
        let scope = self.resolver.resolve(credential);
        Ok(self.store.get(&scope, id)?)
    }

    /// Dataset metadata and aggregates without records.
    pub fn summary(&self, id: DatasetId, credential: Option<&Credential>) -> Result<DatasetSummary> {
        Ok(self.dataset(id, credential)?.summary())
    }

    pub fn report(&self, id: DatasetId, credential: Option<&Credential>) -> Result<ReportModel> {
        let scope = self.resolver.resolve(credential);
        Ok(assemble_report(&self.store, &scope, id)?)
    }

    pub fn delete(&self, id: DatasetId, credential: Option<&Credential>) -> Result<DatasetSummary> {
        let scope = self.resolver.resolve(credential);
        let span = info_span!("delete", scope = %scope, dataset_id = %id);
        let _guard = span.enter();
        Ok(self.store.delete(&scope, id)?)
    }

    /// User behind `credential`; fails unless the credential is valid.
    pub fn whoami(&self, credential: Option<&Credential>) -> Result<UserId> {
        Ok(self.resolver.require_user(credential)?)
    }
}
