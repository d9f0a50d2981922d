//! Export coordinator - main orchestrator for the export process
//!
//! Walks the manifest in order and, for each UMDM and then each of its UMAM
//! children, writes the index row and streams the object's FOXML into its
//! directory. The first failure ends the run; rows and files written before
//! it stay on disk.

use super::index::{CsvExportWriter, ExportWriter};
use super::manifest::ManifestReader;
use super::observer::{ExportObserver, ObjectKind};
use super::summary::ExportSummary;
use crate::adapters::foxml::{FoxmlProcessor, ResolutionContext};
use crate::adapters::handler::{DirectoryObjectHandler, ObjectHandler, ObjectStats};
use crate::adapters::resolver::create_resolver;
use crate::config::ExporterConfig;
use crate::domain::{
    LayoutRegistry, MigrationError, ObjectLayout, Pid, Result, UmamRecord, UmdmRecord,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};

/// Fixed inputs of one run
#[derive(Debug, Clone)]
pub struct ExportContext {
    /// Root of the export tree
    pub target_root: PathBuf,

    /// Base for relative FOXML paths in the manifest
    pub foxml_base_dir: Option<PathBuf>,

    /// Resolver and repository host
    pub resolution: ResolutionContext,
}

impl ExportContext {
    /// Where to read a manifest FOXML reference from
    pub fn foxml_path(&self, foxml: &Path) -> PathBuf {
        match &self.foxml_base_dir {
            Some(base) if foxml.is_relative() => base.join(foxml),
            _ => foxml.to_path_buf(),
        }
    }
}

/// Export coordinator
pub struct ExportCoordinator<R> {
    context: ExportContext,
    manifest: ManifestReader<R>,
    writer: Box<dyn ExportWriter>,
    handler: Box<dyn ObjectHandler>,
    observer: Arc<dyn ExportObserver>,
    layouts: LayoutRegistry,
}

impl ExportCoordinator<BufReader<File>> {
    /// Build a coordinator from configuration
    ///
    /// Creates the target directory and the index file, opens the manifest,
    /// and selects the resolver.
    pub async fn from_config(
        config: &ExporterConfig,
        observer: Arc<dyn ExportObserver>,
    ) -> Result<Self> {
        let resolver = create_resolver(config)?;
        let export = &config.export;

        tokio::fs::create_dir_all(&export.target_dir)
            .await
            .map_err(|e| MigrationError::output(&export.target_dir, e))?;

        let manifest = ManifestReader::open(&export.manifest_path).await?;

        let index_path = export.index_path();
        if let Some(parent) = index_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MigrationError::output(parent, e))?;
        }
        let writer = CsvExportWriter::create(&index_path)?;

        tracing::info!(
            manifest = %export.manifest_path.display(),
            target_dir = %export.target_dir.display(),
            index = %index_path.display(),
            resolver = resolver.kind().as_str(),
            "Export configured"
        );

        let context = ExportContext {
            target_root: export.target_dir.clone(),
            foxml_base_dir: export.foxml_base_dir.clone(),
            resolution: ResolutionContext::new(resolver, config.source.host.clone()),
        };

        let mut coordinator = Self::new(
            context,
            manifest,
            Box::new(writer),
            Box::new(DirectoryObjectHandler::new()),
            observer,
        );
        // An index inside the export root shares its namespace with UMDM directories.
        if index_path.parent() == Some(export.target_dir.as_path()) {
            if let Some(name) = index_path.file_name().and_then(|n| n.to_str()) {
                coordinator.layouts.reserve(name);
            }
        }
        Ok(coordinator)
    }
}

impl<R: AsyncBufRead + Unpin> ExportCoordinator<R> {
    /// Create a coordinator from its collaborators
    pub fn new(
        context: ExportContext,
        manifest: ManifestReader<R>,
        writer: Box<dyn ExportWriter>,
        handler: Box<dyn ObjectHandler>,
        observer: Arc<dyn ExportObserver>,
    ) -> Self {
        Self {
            context,
            manifest,
            writer,
            handler,
            observer,
            layouts: LayoutRegistry::new(),
        }
    }

    /// Execute the export
    ///
    /// Consumes the manifest to the end, then closes the index.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Failures tied to an object are wrapped in
    /// `MigrationError::Object` with that object's pid and FOXML path.
    pub async fn run(mut self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();

        tracing::info!("Starting export");

        while let Some(umdm) = self.manifest.next_record().await? {
            self.export_umdm(&umdm, &mut summary).await?;
        }

        self.writer.close()?;
        summary.index_rows = self.writer.rows_written();

        let summary = summary.with_duration(start_time.elapsed());
        self.observer.run_completed(&summary);
        Ok(summary)
    }

    async fn export_umdm(&mut self, umdm: &UmdmRecord, summary: &mut ExportSummary) -> Result<()> {
        let layout = ObjectLayout::for_umdm(&self.context.target_root, umdm);
        self.claim(&layout, &umdm.pid, umdm.foxml())?;
        self.writer
            .record_parent(umdm, &layout)
            .map_err(|e| e.for_object(umdm.pid.as_str(), umdm.foxml()))?;

        let stats = self
            .export_object(ObjectKind::Umdm, &umdm.pid, umdm.foxml(), &layout)
            .await?;
        summary.umdm_count += 1;
        summary.add_object_stats(stats);

        for umam in umdm.children() {
            self.export_umam(umdm, umam, summary).await?;
        }
        Ok(())
    }

    async fn export_umam(
        &mut self,
        umdm: &UmdmRecord,
        umam: &UmamRecord,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        let layout = ObjectLayout::for_umam(&self.context.target_root, umdm, umam);
        self.claim(&layout, &umam.pid, umam.foxml())?;
        self.writer
            .record_child(umdm, umam, &layout)
            .map_err(|e| e.for_object(umam.pid.as_str(), umam.foxml()))?;

        let stats = self
            .export_object(ObjectKind::Umam, &umam.pid, umam.foxml(), &layout)
            .await?;
        summary.umam_count += 1;
        summary.add_object_stats(stats);
        Ok(())
    }

    fn claim(&mut self, layout: &ObjectLayout, pid: &Pid, foxml: &Path) -> Result<()> {
        self.layouts
            .claim(layout)
            .map_err(|e| e.for_object(pid.as_str(), foxml))
    }

    async fn export_object(
        &mut self,
        kind: ObjectKind,
        pid: &Pid,
        foxml: &Path,
        layout: &ObjectLayout,
    ) -> Result<ObjectStats> {
        let source = self.context.foxml_path(foxml);
        self.observer
            .object_started(kind, pid.as_str(), &source, layout);

        let result = match FoxmlProcessor::open(&source, &self.context.resolution).await {
            Ok(processor) => {
                processor
                    .process_object(layout.directory(), self.handler.as_mut())
                    .await
            }
            Err(e) => Err(e),
        };
        let processed = result.map_err(|e| e.for_object(pid.as_str(), &source))?;

        if let Some(foxml_pid) = processed.info.pid.as_deref() {
            if foxml_pid != pid.as_str() {
                self.observer.pid_mismatch(pid.as_str(), foxml_pid, &source);
            }
        }

        self.observer
            .object_completed(kind, pid.as_str(), processed.stats);
        Ok(processed.stats)
    }
}
