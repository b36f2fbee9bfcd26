use super::{
    AcquirePackagesUseCase, AggregateReportsUseCase, ProcessArtifactsUseCase,
    RegisterRepositoriesUseCase,
};
use crate::application::dto::{
    AcquisitionOutcome, DownloadMode, PipelineSettings, PipelineSummary,
};
use crate::application::PipelineRun;
use crate::package_audit::domain::{
    DownloadedArtifact, PackageRequest, PipelineStage, RepositoryRegistry,
};
use crate::package_audit::services::ManifestParser;
use crate::ports::outbound::{
    ArtifactStore, CommandRunner, CommandSpec, HttpFetcher, InputReader, LogSink, LogStream,
    MetadataTableWriter, PackageArchiveReader, ProgressReporter, ScanSummaryFormatter,
    SummaryGenerator, TextFileWriter,
};
use crate::shared::error::PipelineError;
use crate::shared::Result;
use std::collections::HashMap;

/// Every outbound adapter the pipeline talks to
///
/// `summary_generator` is `None` when no language-model credentials are
/// configured.
pub struct PipelineAdapters<CR, HF, AS, IR, TW, AR, MW, SF, SG, LS, PR> {
    pub command_runner: CR,
    pub http_fetcher: HF,
    pub artifact_store: AS,
    pub input_reader: IR,
    pub text_writer: TW,
    pub archive_reader: AR,
    pub table_writer: MW,
    pub summary_formatter: SF,
    pub summary_generator: Option<SG>,
    pub log_sink: LS,
    pub progress_reporter: PR,
}

/// Lines read from the input files of a run
struct LoadedRequests {
    requests: Vec<PackageRequest>,
    rejected: usize,
}

/// RunPipelineUseCase - drives one audit run from inputs to reports
///
/// Stages run in a fixed order:
/// `Init → RepositoriesLoaded → PackagesAcquired → ArtifactsRelocated →
/// Processing → Aggregating → Done`. A failure inside a stage is logged
/// against the package or artifact it belongs to and the run moves on.
/// Only an output tree that cannot be created aborts the run.
pub struct RunPipelineUseCase<CR, HF, AS, IR, TW, AR, MW, SF, SG, LS, PR> {
    adapters: PipelineAdapters<CR, HF, AS, IR, TW, AR, MW, SF, SG, LS, PR>,
}

impl<CR, HF, AS, IR, TW, AR, MW, SF, SG, LS, PR>
    RunPipelineUseCase<CR, HF, AS, IR, TW, AR, MW, SF, SG, LS, PR>
where
    CR: CommandRunner,
    HF: HttpFetcher,
    AS: ArtifactStore,
    IR: InputReader + Clone + 'static,
    TW: TextFileWriter,
    AR: PackageArchiveReader + Clone + 'static,
    MW: MetadataTableWriter,
    SF: ScanSummaryFormatter,
    SG: SummaryGenerator,
    LS: LogSink,
    PR: ProgressReporter,
{
    pub fn new(adapters: PipelineAdapters<CR, HF, AS, IR, TW, AR, MW, SF, SG, LS, PR>) -> Self {
        Self { adapters }
    }

    /// Runs the whole pipeline
    ///
    /// # Errors
    /// Returns `PipelineError::OutputDirectory` when the output tree or the
    /// work directory cannot be prepared. Every other failure is logged and reflected in the summary.
    pub async fn execute(&self, settings: &PipelineSettings) -> Result<PipelineSummary> {
        let a = &self.adapters;
        let run = PipelineRun::new(settings.layout.clone());
        run.prepare_directories()?;
        std::fs::create_dir_all(&settings.work_dir).map_err(|e| PipelineError::OutputDirectory {
            path: settings.work_dir.clone(),
            details: e.to_string(),
        })?;

        let mut stage = PipelineStage::Init;
        a.log_sink.info(
            LogStream::Report,
            &format!("Run {} started in {} mode", run.run_id(), settings.mode),
        );
        a.progress_reporter.report(&format!(
            "🚀 Starting package audit ({} mode) into {}",
            settings.mode,
            settings.layout.root.display()
        ));

        let registry = self.load_repositories(settings);
        if settings.mode == DownloadMode::Repository
            && settings.register_sources
            && !registry.is_empty()
        {
            a.progress_reporter
                .report(&format!("🔑 Registering {} repository(ies)...", registry.len()));
            RegisterRepositoriesUseCase::new(
                &a.command_runner,
                &a.http_fetcher,
                &a.artifact_store,
                &a.text_writer,
                &a.log_sink,
                settings,
            )
            .execute(&registry)
            .await;
        }
        stage = self.advance(stage);

        let loaded = self.load_requests(settings, &registry);
        a.progress_reporter.report(&format!(
            "📥 Acquiring {} requested package(s)...",
            loaded.requests.len()
        ));
        let requests = loaded.requests.len();
        let mut acquisition = AcquirePackagesUseCase::new(
            &a.command_runner,
            &a.http_fetcher,
            &a.artifact_store,
            &a.log_sink,
            &a.progress_reporter,
            settings,
            &run,
        )
        .execute(loaded.requests, &registry)
        .await;
        stage = self.advance(stage);

        acquisition.relocated += self.final_relocation(settings, &run);
        if settings.mode == DownloadMode::Repository {
            self.clean_package_cache(settings).await;
        }
        stage = self.advance(stage);

        stage = self.advance(stage);
        let artifacts = self.collect_artifacts(&run, &acquisition);
        let reports = ProcessArtifactsUseCase::new(
            &a.command_runner,
            &a.input_reader,
            &a.archive_reader,
            &a.log_sink,
            &a.progress_reporter,
            settings,
            &run,
        )
        .execute(artifacts)
        .await;

        stage = self.advance(stage);
        a.progress_reporter.report("📝 Writing reports...");
        let (tally, report_outcome) = AggregateReportsUseCase::new(
            &a.table_writer,
            &a.summary_formatter,
            &a.text_writer,
            a.summary_generator.as_ref(),
            &a.log_sink,
            settings,
            &run,
        )
        .execute(&reports)
        .await;

        self.teardown(settings, &run).await;
        stage = self.advance(stage);
        a.progress_reporter.report_completion(&format!(
            "Audit finished: {} artifact(s) processed",
            tally.artifacts
        ));

        Ok(PipelineSummary {
            run_id: run.run_id(),
            mode: settings.mode,
            final_stage: stage,
            repositories: registry.len(),
            requests,
            rejected_lines: loaded.rejected,
            acquisition,
            tally,
            reports: report_outcome,
        })
    }

    fn advance(&self, stage: PipelineStage) -> PipelineStage {
        let next = stage.next();
        self.adapters.log_sink.info(
            LogStream::Report,
            &format!("Stage {} -> {}", stage, next),
        );
        next
    }

    /// The repository list is only read in repository mode
    fn load_repositories(&self, settings: &PipelineSettings) -> RepositoryRegistry {
        let a = &self.adapters;
        if settings.mode != DownloadMode::Repository {
            return RepositoryRegistry::new();
        }

        let content = match a
            .input_reader
            .read_repository_list(&settings.repository_list_path)
        {
            Ok(content) => content,
            Err(e) => {
                a.log_sink.error(LogStream::Download, &format!("{:#}", e));
                return RepositoryRegistry::new();
            }
        };

        let outcome = RepositoryRegistry::parse(&content);
        for rejected in &outcome.rejected {
            a.log_sink
                .warning(LogStream::Download, &rejected.to_string());
        }
        let registry = RepositoryRegistry::from_entries(outcome.items);
        a.log_sink.info(
            LogStream::Download,
            &format!("Loaded {} repository(ies)", registry.len()),
        );
        registry
    }

    fn load_requests(
        &self,
        settings: &PipelineSettings,
        registry: &RepositoryRegistry,
    ) -> LoadedRequests {
        let a = &self.adapters;
        let empty = LoadedRequests {
            requests: Vec::new(),
            rejected: 0,
        };

        let parsed = match settings.mode {
            DownloadMode::Repository => a
                .input_reader
                .read_manifest(&settings.manifest_path)
                .map(|content| ManifestParser::parse(&content, registry)),
            DownloadMode::Url => a
                .input_reader
                .read_entry_list(&settings.urls_file)
                .map(|content| ManifestParser::parse_url_list(&content)),
            DownloadMode::Filename => {
                if settings.base_url.is_none() {
                    a.log_sink.error(
                        LogStream::Download,
                        "BASE_URL is not set; nothing to download in filename mode",
                    );
                    return empty;
                }
                a.input_reader
                    .read_entry_list(&settings.filenames_file)
                    .map(|content| ManifestParser::parse_filename_list(&content))
            }
        };

        let outcome = match parsed {
            Ok(outcome) => outcome,
            Err(e) => {
                a.log_sink.error(LogStream::Download, &format!("{:#}", e));
                return empty;
            }
        };

        for rejected in &outcome.rejected {
            a.log_sink
                .warning(LogStream::Download, &rejected.to_string());
        }
        LoadedRequests {
            rejected: outcome.rejected.len(),
            requests: outcome.items,
        }
    }

    fn final_relocation(&self, settings: &PipelineSettings, run: &PipelineRun) -> usize {
        let a = &self.adapters;
        match a
            .artifact_store
            .relocate(&settings.relocation_sources(), &run.layout().packages_dir)
        {
            Ok(relocation) => {
                for (path, reason) in &relocation.skipped {
                    a.log_sink.warning(
                        LogStream::Download,
                        &format!("Left {} in place: {}", path.display(), reason),
                    );
                }
                a.log_sink.info(
                    LogStream::Download,
                    &format!(
                        "Final sweep moved {} archive(s) into {}",
                        relocation.moved_count(),
                        run.layout().packages_dir.display()
                    ),
                );
                relocation.moved_count()
            }
            Err(e) => {
                a.log_sink.error(
                    LogStream::Download,
                    &format!("Failed to relocate package archives: {:#}", e),
                );
                0
            }
        }
    }

    async fn clean_package_cache(&self, settings: &PipelineSettings) {
        let a = &self.adapters;
        let command = CommandSpec::new(&settings.tools.apt_get)
            .arg("clean")
            .privileged(settings.use_sudo);
        let failure = match a.command_runner.invoke(&command).await {
            Ok(output) if output.success() => None,
            Ok(output) => Some(output.failure_detail()),
            Err(e) => Some(format!("{:#}", e)),
        };
        if let Some(detail) = failure {
            a.log_sink.warning(
                LogStream::Download,
                &format!("Failed to clean the package cache: {}", detail),
            );
        }
    }

    fn collect_artifacts(
        &self,
        run: &PipelineRun,
        acquisition: &AcquisitionOutcome,
    ) -> Vec<DownloadedArtifact> {
        let a = &self.adapters;
        let origins: HashMap<_, _> = acquisition
            .origins
            .iter()
            .map(|(path, request)| (path, request))
            .collect();

        match a.artifact_store.list_artifacts(&run.layout().packages_dir) {
            Ok(paths) => paths
                .into_iter()
                .map(|path| {
                    let origin = origins.get(&path).map(|request| (*request).clone());
                    DownloadedArtifact::new(path, origin)
                })
                .collect(),
            Err(e) => {
                a.log_sink.error(
                    LogStream::Sbom,
                    &format!("Failed to list package archives: {:#}", e),
                );
                Vec::new()
            }
        }
    }

    /// Hands the output tree to the configured user and opens its permissions
    async fn teardown(&self, settings: &PipelineSettings, run: &PipelineRun) {
        let a = &self.adapters;
        if let Some(user) = &settings.chown_user {
            let command = CommandSpec::new("chown")
                .args([
                    "-R".to_string(),
                    user.clone(),
                    run.layout().root.to_string_lossy().into_owned(),
                ])
                .privileged(settings.use_sudo);
            let failure = match a.command_runner.invoke(&command).await {
                Ok(output) if output.success() => None,
                Ok(output) => Some(output.failure_detail()),
                Err(e) => Some(format!("{:#}", e)),
            };
            if let Some(detail) = failure {
                a.log_sink.warning(
                    LogStream::Report,
                    &format!("Failed to change owner of the output tree to {}: {}", user, detail),
                );
            }
        }

        if let Err(e) = run.relax_permissions() {
            a.log_sink.warning(
                LogStream::Report,
                &format!("Failed to relax permissions of the output tree: {:#}", e),
            );
        }
    }
}
