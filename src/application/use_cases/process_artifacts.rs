use crate::application::dto::PipelineSettings;
use crate::application::PipelineRun;
use crate::package_audit::domain::{
    ArtifactReport, DownloadedArtifact, MalwareVerdict, PackageMetadata, ScanKind, ScanResult,
    ScanStatus, Severity,
};
use crate::package_audit::policies::LicenseDetector;
use crate::package_audit::services::{ControlParagraph, TrivyReportParser};
use crate::ports::outbound::{
    CommandRunner, CommandSpec, InputReader, LogSink, LogStream, PackageArchiveReader,
    ProgressReporter,
};
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// ProcessArtifactsUseCase - scans every archive in the packages directory
///
/// Per artifact, independently and on a pool of `workers`:
/// 1. generate a CycloneDX SBOM
/// 2. scan that SBOM for vulnerabilities (only if step 1 succeeded)
/// 3. run the antivirus scanner
/// 4. extract control metadata and a license guess
///
/// A failing step is recorded in the artifact's report and never affects
/// other artifacts or later steps. Archive and result-document reads run on
/// the blocking pool so one large package does not stall the other workers.
pub struct ProcessArtifactsUseCase<'a, CR, IR, AR, LS, PR> {
    command_runner: &'a CR,
    input_reader: &'a IR,
    archive_reader: &'a AR,
    log_sink: &'a LS,
    progress_reporter: &'a PR,
    settings: &'a PipelineSettings,
    run: &'a PipelineRun,
}

impl<'a, CR, IR, AR, LS, PR> ProcessArtifactsUseCase<'a, CR, IR, AR, LS, PR>
where
    CR: CommandRunner,
    IR: InputReader + Clone + 'static,
    AR: PackageArchiveReader + Clone + 'static,
    LS: LogSink,
    PR: ProgressReporter,
{
    pub fn new(
        command_runner: &'a CR,
        input_reader: &'a IR,
        archive_reader: &'a AR,
        log_sink: &'a LS,
        progress_reporter: &'a PR,
        settings: &'a PipelineSettings,
        run: &'a PipelineRun,
    ) -> Self {
        Self {
            command_runner,
            input_reader,
            archive_reader,
            log_sink,
            progress_reporter,
            settings,
            run,
        }
    }

    pub async fn execute(&self, artifacts: Vec<DownloadedArtifact>) -> Vec<ArtifactReport> {
        let total = artifacts.len();
        if total == 0 {
            self.log_sink
                .warning(LogStream::Sbom, "No package archives to process");
            return Vec::new();
        }

        if self.settings.malware_scan {
            self.update_malware_definitions().await;
        }

        self.progress_reporter.report(&format!(
            "🔍 Processing {} package archive(s) with {} worker(s)...",
            total,
            self.settings.workers.max(1)
        ));
        let completed = AtomicUsize::new(0);

        stream::iter(artifacts)
            .map(|artifact| {
                let completed = &completed;
                async move {
                    let report = self.process_one(artifact).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    self.progress_reporter.report_progress(
                        done,
                        total,
                        Some(&report.artifact.file_name()),
                    );
                    report
                }
            })
            .buffer_unordered(self.settings.workers.max(1))
            .collect()
            .await
    }

    async fn process_one(&self, artifact: DownloadedArtifact) -> ArtifactReport {
        let stem = artifact.stem();
        let sbom = self.generate_sbom(&artifact, &stem).await;

        let vulnerabilities = if sbom.is_success() {
            Some(self.scan_sbom(&artifact, &sbom.output_path, &stem).await)
        } else {
            None
        };

        let malware = if self.settings.malware_scan {
            self.scan_malware(&artifact).await
        } else {
            MalwareVerdict::NotScanned
        };

        let metadata = self.extract_metadata(&artifact).await;
        self.run.record_metadata(metadata.clone());

        ArtifactReport {
            artifact,
            sbom,
            vulnerabilities,
            malware,
            metadata,
        }
    }

    /// Runs a scanner command and classifies the outcome
    ///
    /// Success requires exit code 0 and the output document on disk.
    async fn run_scanner(
        &self,
        kind: ScanKind,
        stream: LogStream,
        command: CommandSpec,
        output_path: PathBuf,
    ) -> ScanResult {
        match self.command_runner.invoke(&command).await {
            Ok(output) if output.success() && output_path.is_file() => {
                ScanResult::success(kind, output_path)
            }
            Ok(output) if output.success() => {
                let detail = format!("`{}` wrote no output document", command);
                self.log_sink.error(stream, &detail);
                ScanResult::failed(kind, output_path, ScanStatus::ToolError, detail)
            }
            Ok(output) => {
                let detail = output.failure_detail();
                self.log_sink
                    .error(stream, &format!("`{}` failed: {}", command, detail));
                ScanResult::failed(kind, output_path, ScanStatus::ToolError, detail)
            }
            Err(e) => {
                let detail = format!("{:#}", e);
                self.log_sink.error(stream, &detail);
                ScanResult::failed(kind, output_path, ScanStatus::Exception, detail)
            }
        }
    }

    async fn generate_sbom(&self, artifact: &DownloadedArtifact, stem: &str) -> ScanResult {
        let sbom_path = self.run.layout().sbom_path(stem);
        let command = CommandSpec::new(&self.settings.tools.trivy).args([
            "fs".to_string(),
            "--format".to_string(),
            "cyclonedx".to_string(),
            "--output".to_string(),
            path_arg(&sbom_path),
            path_arg(artifact.file_path()),
        ]);

        let result = self
            .run_scanner(ScanKind::Sbom, LogStream::Sbom, command, sbom_path)
            .await;
        if result.is_success() {
            self.log_sink.info(
                LogStream::Sbom,
                &format!(
                    "Generated SBOM for {}: {}",
                    artifact.file_name(),
                    result.output_path.display()
                ),
            );
        }
        result
    }

    async fn scan_sbom(
        &self,
        artifact: &DownloadedArtifact,
        sbom_path: &Path,
        stem: &str,
    ) -> ScanResult {
        let result_path = self.run.layout().vulnerability_result_path(stem);
        let command = CommandSpec::new(&self.settings.tools.trivy).args([
            "sbom".to_string(),
            "--format".to_string(),
            "json".to_string(),
            "--output".to_string(),
            path_arg(&result_path),
            path_arg(sbom_path),
        ]);

        let result = self
            .run_scanner(
                ScanKind::Vulnerability,
                LogStream::VulnerabilityScan,
                command,
                result_path,
            )
            .await;
        if !result.is_success() {
            return result;
        }

        let reader = self.input_reader.clone();
        let document_path = result.output_path.clone();
        let parsed = off_thread(move || {
            reader
                .read_scan_result(&document_path)
                .and_then(|document| TrivyReportParser::parse(&document))
        })
        .await;
        let findings = match parsed {
            Ok(findings) => findings,
            Err(e) => {
                self.log_sink.warning(
                    LogStream::VulnerabilityScan,
                    &format!(
                        "Could not read findings from {}: {:#}",
                        result.output_path.display(),
                        e
                    ),
                );
                Vec::new()
            }
        };

        let result = result.with_findings(findings);
        let counts: Vec<String> = Severity::ALL
            .iter()
            .map(|severity| format!("{}={}", severity, result.count_by_severity(*severity)))
            .collect();
        self.log_sink.info(
            LogStream::VulnerabilityScan,
            &format!(
                "Scanned {}: {} vulnerabilities ({})",
                artifact.file_name(),
                result.findings.len(),
                counts.join(", ")
            ),
        );
        result
    }

    async fn scan_malware(&self, artifact: &DownloadedArtifact) -> MalwareVerdict {
        let command = CommandSpec::new(&self.settings.tools.clamscan).args([
            "--infected".to_string(),
            "--remove=no".to_string(),
            "--recursive".to_string(),
            path_arg(artifact.file_path()),
        ]);

        let verdict = match self.command_runner.invoke(&command).await {
            Ok(output) => {
                MalwareVerdict::from_exit_code(output.exit_code, &output.stdout, &output.stderr)
            }
            Err(e) => MalwareVerdict::ScanError(format!("{:#}", e)),
        };

        match &verdict {
            MalwareVerdict::Clean => self.log_sink.info(
                LogStream::MalwareScan,
                &format!("{} is clean", artifact.file_name()),
            ),
            MalwareVerdict::Infected(detail) => self.log_sink.warning(
                LogStream::MalwareScan,
                &format!("Malware detected in {}: {}", artifact.file_name(), detail.trim()),
            ),
            MalwareVerdict::ScanError(detail) => self.log_sink.error(
                LogStream::MalwareScan,
                &format!("Malware scan of {} failed: {}", artifact.file_name(), detail.trim()),
            ),
            MalwareVerdict::NotScanned => {}
        }
        verdict
    }

    async fn update_malware_definitions(&self) {
        let command =
            CommandSpec::new(&self.settings.tools.freshclam).privileged(self.settings.use_sudo);
        let failure = match self.command_runner.invoke(&command).await {
            Ok(output) if output.success() => None,
            Ok(output) => Some(output.failure_detail()),
            Err(e) => Some(format!("{:#}", e)),
        };

        match failure {
            None => self
                .log_sink
                .info(LogStream::MalwareScan, "Malware definitions updated"),
            Some(detail) => self.log_sink.warning(
                LogStream::MalwareScan,
                &format!(
                    "Could not update malware definitions, scanning with the installed ones: {}",
                    detail
                ),
            ),
        }
    }

    /// Control fields plus a license guess; empty strings for anything unknown
    async fn extract_metadata(&self, artifact: &DownloadedArtifact) -> PackageMetadata {
        let path = artifact.file_path();
        let reader = self.archive_reader.clone();
        let archive = path.to_path_buf();
        let control = match off_thread(move || reader.read_control(&archive)).await {
            Ok(text) => ControlParagraph::parse(&text),
            Err(e) => {
                self.log_sink.warning(
                    LogStream::Metadata,
                    &format!(
                        "Could not read control data from {}: {:#}",
                        artifact.file_name(),
                        e
                    ),
                );
                return PackageMetadata::default();
            }
        };

        let name = control.field_or_empty("Package");
        let license_type = if name.is_empty() {
            String::new()
        } else {
            self.detect_license(path, &name).await
        };

        let metadata = PackageMetadata::new(
            name,
            control.field_or_empty("Version"),
            license_type,
            control.field_or_empty("Homepage"),
        );
        self.log_sink.info(
            LogStream::Metadata,
            &format!(
                "{}: name={}, version={}, license={}, homepage={}",
                artifact.file_name(),
                metadata.name,
                metadata.version,
                metadata.license_type,
                metadata.homepage_url
            ),
        );
        metadata
    }

    async fn detect_license(&self, archive: &Path, package: &str) -> String {
        let member = format!("usr/share/doc/{}/copyright", package);
        let reader = self.archive_reader.clone();
        let archive = archive.to_path_buf();
        let wanted = member.clone();
        match off_thread(move || reader.read_data_file(&archive, &wanted)).await {
            Ok(Some(text)) => LicenseDetector::license_type(&text),
            Ok(None) => {
                self.log_sink.warning(
                    LogStream::Metadata,
                    &format!("{} has no {}", package, member),
                );
                String::new()
            }
            Err(e) => {
                self.log_sink.warning(
                    LogStream::Metadata,
                    &format!("Could not read {} from {}: {:#}", member, package, e),
                );
                String::new()
            }
        }
    }
}

/// Runs synchronous file work on the blocking pool
async fn off_thread<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| anyhow::anyhow!("blocking read task failed: {}", e))?
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
