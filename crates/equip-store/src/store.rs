//! Scope-partitioned dataset history with a fixed retention limit.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use equip_model::{
    Aggregates, Dataset, DatasetId, DatasetSummary, EquipmentRecord, HistoryScope,
    RETENTION_LIMIT,
};

use crate::backend::HistoryBackend;
use crate::error::{Result, StoreError};

/// Datasets of one scope, oldest first.
#[derive(Debug, Default)]
struct ScopeHistory {
    datasets: VecDeque<Arc<Dataset>>,
}

impl ScopeHistory {
    fn position(&self, id: DatasetId) -> Option<usize> {
        self.datasets.iter().position(|dataset| dataset.id == id)
    }
}

/// Owner of every stored dataset.
///
/// Each scope has its own mutex: insert, eviction and the durable write of one
/// scope are serialized, while different scopes never wait on each other. The
/// outer table lock is only taken for writing when a scope is seen for the
/// first time.
pub struct DatasetStore {
    scopes: RwLock<HashMap<HistoryScope, Arc<Mutex<ScopeHistory>>>>,
    backend: Option<Box<dyn HistoryBackend>>,
}

impl fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetStore")
            .field("scopes", &self.scopes.read().len())
            .field("durable", &self.backend.is_some())
            .finish()
    }
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl DatasetStore {
    /// Store that keeps history for the lifetime of the process only.
    pub fn in_memory() -> Self {
        Self {
            scopes: RwLock::new(HashMap::new()),
            backend: None,
        }
    }

    /// Store backed by `backend`, preloaded with every history it holds.
    pub fn open(backend: impl HistoryBackend + 'static) -> Result<Self> {
        let mut loaded: HashMap<HistoryScope, Vec<Dataset>> = HashMap::new();
        for snapshot in backend.load_all()? {
            let scope = snapshot.scope;
            let owned = snapshot.datasets.into_iter().filter(|dataset| {
                let owned = dataset.owner_scope == scope;
                if !owned {
                    tracing::warn!(
                        scope = %scope,
                        dataset_id = %dataset.id,
                        "skipping dataset stored under a foreign scope"
                    );
                }
                owned
            });
            match loaded.get_mut(&scope) {
                Some(datasets) => {
                    tracing::warn!(scope = %scope, "merging duplicate snapshot of scope");
                    for dataset in owned {
                        if !datasets.iter().any(|known| known.id == dataset.id) {
                            datasets.push(dataset);
                        }
                    }
                }
                None => {
                    let datasets: Vec<Dataset> = owned.collect();
                    loaded.insert(scope, datasets);
                }
            }
        }

        let mut scopes = HashMap::with_capacity(loaded.len());
        for (scope, mut datasets) in loaded {
            datasets.sort_by_key(|dataset| dataset.uploaded_at);
            if datasets.len() > RETENTION_LIMIT {
                tracing::warn!(
                    scope = %scope,
                    stored = datasets.len(),
                    limit = RETENTION_LIMIT,
                    "trimming snapshot over retention limit"
                );
                datasets.drain(..datasets.len() - RETENTION_LIMIT);
            }
            let history = ScopeHistory {
                datasets: datasets.into_iter().map(Arc::new).collect(),
            };
            scopes.insert(scope, Arc::new(Mutex::new(history)));
        }
        tracing::info!(scopes = scopes.len(), "dataset store opened");
        Ok(Self {
            scopes: RwLock::new(scopes),
            backend: Some(Box::new(backend)),
        })
    }

    /// Whether changes are written through to a backend.
    pub fn is_durable(&self) -> bool {
        self.backend.is_some()
    }

    /// Store a new dataset in `scope`, evicting the oldest ones over the limit.
    ///
    /// The id and timestamp are assigned under the scope lock, so timestamp
    /// order within a scope always matches completion order.
    pub fn save(
        &self,
        scope: &HistoryScope,
        filename: &str,
        records: Vec<EquipmentRecord>,
        aggregates: Aggregates,
    ) -> Result<Arc<Dataset>> {
        let slot = self.slot(scope);
        let mut history = slot.lock();

        let now = Utc::now();
        let uploaded_at = match history.datasets.back() {
            Some(latest) if latest.uploaded_at > now => latest.uploaded_at,
            _ => now,
        };
        let dataset = Arc::new(Dataset {
            id: DatasetId::generate(),
            filename: filename.to_string(),
            uploaded_at,
            owner_scope: scope.clone(),
            records,
            aggregates,
        });

        history.datasets.push_back(Arc::clone(&dataset));
        let mut evicted = Vec::new();
        while history.datasets.len() > RETENTION_LIMIT {
            if let Some(oldest) = history.datasets.pop_front() {
                evicted.push(oldest);
            }
        }

        if let Some(backend) = &self.backend
            && let Err(error) = backend.persist(scope, history.datasets.make_contiguous())
        {
            history.datasets.pop_back();
            for oldest in evicted.into_iter().rev() {
                history.datasets.push_front(oldest);
            }
            tracing::error!(scope = %scope, %error, "failed to persist dataset; save rolled back");
            return Err(error);
        }

        for oldest in &evicted {
            tracing::debug!(
                scope = %scope,
                dataset_id = %oldest.id,
                filename = %oldest.filename,
                "dataset evicted"
            );
        }
        tracing::info!(
            scope = %scope,
            dataset_id = %dataset.id,
            filename = %dataset.filename,
            records = dataset.records.len(),
            evicted = evicted.len(),
            "dataset saved"
        );
        Ok(dataset)
    }

    /// History of `scope`, newest first, without record payloads.
    pub fn list(&self, scope: &HistoryScope) -> Vec<DatasetSummary> {
        let Some(slot) = self.existing_slot(scope) else {
            return Vec::new();
        };
        let history = slot.lock();
        history
            .datasets
            .iter()
            .rev()
            .map(|dataset| dataset.summary())
            .collect()
    }

    /// Fetch a dataset; datasets of other scopes are never visible.
    pub fn get(&self, scope: &HistoryScope, id: DatasetId) -> Result<Arc<Dataset>> {
        let slot = self.existing_slot(scope).ok_or(StoreError::NotFound { id })?;
        let history = slot.lock();
        history
            .position(id)
            .and_then(|idx| history.datasets.get(idx))
            .map(Arc::clone)
            .ok_or(StoreError::NotFound { id })
    }

    /// Remove a dataset from `scope`, returning its summary.
    pub fn delete(&self, scope: &HistoryScope, id: DatasetId) -> Result<DatasetSummary> {
        let slot = self.existing_slot(scope).ok_or(StoreError::NotFound { id })?;
        let mut history = slot.lock();
        let idx = history.position(id).ok_or(StoreError::NotFound { id })?;
        let removed = history
            .datasets
            .remove(idx)
            .ok_or(StoreError::NotFound { id })?;

        if let Some(backend) = &self.backend
            && let Err(error) = backend.persist(scope, history.datasets.make_contiguous())
        {
            history.datasets.insert(idx, removed);
            tracing::error!(scope = %scope, %error, "failed to persist deletion; rolled back");
            return Err(error);
        }

        tracing::info!(
            scope = %scope,
            dataset_id = %removed.id,
            filename = %removed.filename,
            "dataset deleted"
        );
        Ok(removed.summary())
    }

    /// Number of datasets currently held for `scope`.
    pub fn len(&self, scope: &HistoryScope) -> usize {
        self.existing_slot(scope)
            .map_or(0, |slot| slot.lock().datasets.len())
    }

    pub fn is_empty(&self, scope: &HistoryScope) -> bool {
        self.len(scope) == 0
    }

    fn existing_slot(&self, scope: &HistoryScope) -> Option<Arc<Mutex<ScopeHistory>>> {
        self.scopes.read().get(scope).map(Arc::clone)
    }

    fn slot(&self, scope: &HistoryScope) -> Arc<Mutex<ScopeHistory>> {
        if let Some(slot) = self.existing_slot(scope) {
            return slot;
        }
        let mut scopes = self.scopes.write();
        Arc::clone(scopes.entry(scope.clone()).or_default())
    }
}
