//! Service setup and file handling behind the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use equip_core::{AppConfig, CONFIG_FILE_NAME, Credential, EquipmentService};
use equip_model::{Dataset, DatasetId, DatasetSummary, UserId};
use equip_report::{JsonReportRenderer, ReportRenderer, TextReportRenderer, report_file_name};

/// Flags that decide how the service is configured.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Explicit config file; must exist when set.
    pub config: Option<PathBuf>,
    /// Overrides `data_dir` from the config file.
    pub data_dir: Option<PathBuf>,
    pub token: Option<String>,
    /// Overrides `max_upload_bytes` from the config file.
    pub max_upload_bytes: Option<usize>,
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            Self::Text => Box::new(TextReportRenderer::new()),
            Self::Json => Box::new(JsonReportRenderer),
        }
    }
}

/// Where a rendered report went.
#[derive(Debug)]
pub enum ReportOutput {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Resolve configuration from flags.
///
/// `--config` wins; otherwise `<data-dir>/equipment.toml` is read when present.
/// Flag values then override file values.
pub fn load_config(options: &SessionOptions) -> Result<AppConfig> {
    let mut config = match (&options.config, &options.data_dir) {
        (Some(path), _) => AppConfig::load(path)?,
        (None, Some(dir)) => AppConfig::load_or_default(&dir.join(CONFIG_FILE_NAME))?,
        (None, None) => AppConfig::default(),
    };
    if let Some(dir) = &options.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(limit) = options.max_upload_bytes {
        config.max_upload_bytes = limit;
    }
    Ok(config)
}

/// A configured service plus the caller's credential.
#[derive(Debug)]
pub struct Session {
    service: EquipmentService,
    credential: Option<Credential>,
}

impl Session {
    pub fn open(options: &SessionOptions) -> Result<Self> {
        let config = load_config(options)?;
        let service =
            EquipmentService::from_config(&config).context("failed to open dataset history")?;
        debug!(
            durable = service.store().is_durable(),
            authenticated = options.token.is_some(),
            "session opened"
        );
        Ok(Self::new(service, options.token.as_deref().map(Credential::new)))
    }

    pub fn new(service: EquipmentService, credential: Option<Credential>) -> Self {
        Self {
            service,
            credential,
        }
    }

    pub fn service(&self) -> &EquipmentService {
        &self.service
    }

    fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Upload a CSV file; `name` replaces the file's own name in history.
    pub fn upload(&self, path: &Path, name: Option<&str>) -> Result<Arc<Dataset>> {
        let filename = match name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .with_context(|| format!("{} has no file name", path.display()))?,
        };
        let metadata =
            fs::metadata(path).with_context(|| format!("failed to read {}", path.display()))?;
        let limit = self.service.max_upload_bytes();
        if metadata.len() > limit as u64 {
            // Checked before the file is read into memory.
            return Err(equip_ingest::IngestError::UploadTooLarge {
                size: usize::try_from(metadata.len()).unwrap_or(usize::MAX),
                limit,
            }
            .into());
        }
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(self.service.upload(&filename, &bytes, self.credential())?)
    }

    pub fn history(&self) -> Vec<DatasetSummary> {
        self.service.history(self.credential())
    }

    pub fn dataset(&self, id: DatasetId) -> Result<Arc<Dataset>> {
        Ok(self.service.dataset(id, self.credential())?)
    }

    pub fn summary(&self, id: DatasetId) -> Result<DatasetSummary> {
        Ok(self.service.summary(id, self.credential())?)
    }

    pub fn delete(&self, id: DatasetId) -> Result<DatasetSummary> {
        Ok(self.service.delete(id, self.credential())?)
    }

    pub fn whoami(&self) -> Result<UserId> {
        Ok(self.service.whoami(self.credential())?)
    }

    /// Render the report for `id`.
    ///
    /// With `output` set the report is written to that file, or to
    /// `equipment_report_<id>.<ext>` inside it when it is a directory.
    pub fn report(
        &self,
        id: DatasetId,
        format: ReportFormat,
        output: Option<&Path>,
    ) -> Result<ReportOutput> {
        let report = self.service.report(id, self.credential())?;
        let renderer = format.renderer();
        let bytes = renderer.render_to_vec(&report)?;
        let Some(output) = output else {
            return Ok(ReportOutput::Bytes(bytes));
        };

        let path = if output.is_dir() {
            output.join(report_file_name(&report, renderer.as_ref()))
        } else {
            output.to_path_buf()
        };
        fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            dataset_id = %id,
            path = %path.display(),
            content_type = renderer.content_type(),
            "report written"
        );
        Ok(ReportOutput::File(path))
    }
}
