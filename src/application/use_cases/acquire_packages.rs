use crate::application::dto::{AcquisitionOutcome, PipelineSettings};
use crate::application::PipelineRun;
use crate::package_audit::domain::{PackageRequest, PackageSource, RepositoryRegistry};
use crate::package_audit::services::{DependencyParser, UrlBuilder};
use crate::ports::outbound::{
    ArtifactStore, CommandRunner, CommandSpec, HttpFetcher, LogSink, LogStream, ProgressReporter,
};
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};

/// AcquirePackagesUseCase - downloads every requested package archive
///
/// Package-manager requests run one at a time: each is expanded to its
/// recursive dependencies, downloaded with retries and swept into the
/// packages directory. Every other request is fetched over HTTP on a
/// bounded pool of `workers` concurrent downloads.
///
/// Each request's dedup key is claimed before its first attempt, so a key
/// seen twice in a run is downloaded at most once.
pub struct AcquirePackagesUseCase<'a, CR, HF, AS, LS, PR> {
    command_runner: &'a CR,
    http_fetcher: &'a HF,
    artifact_store: &'a AS,
    log_sink: &'a LS,
    progress_reporter: &'a PR,
    settings: &'a PipelineSettings,
    run: &'a PipelineRun,
}

impl<'a, CR, HF, AS, LS, PR> AcquirePackagesUseCase<'a, CR, HF, AS, LS, PR>
where
    CR: CommandRunner,
    HF: HttpFetcher,
    AS: ArtifactStore,
    LS: LogSink,
    PR: ProgressReporter,
{
    pub fn new(
        command_runner: &'a CR,
        http_fetcher: &'a HF,
        artifact_store: &'a AS,
        log_sink: &'a LS,
        progress_reporter: &'a PR,
        settings: &'a PipelineSettings,
        run: &'a PipelineRun,
    ) -> Self {
        Self {
            command_runner,
            http_fetcher,
            artifact_store,
            log_sink,
            progress_reporter,
            settings,
            run,
        }
    }

    pub async fn execute(
        &self,
        requests: Vec<PackageRequest>,
        registry: &RepositoryRegistry,
    ) -> AcquisitionOutcome {
        let (managed, remote): (Vec<_>, Vec<_>) = requests
            .into_iter()
            .partition(|request| *request.source() == PackageSource::PackageManager);

        let mut outcome = AcquisitionOutcome::default();
        for request in &managed {
            outcome.merge(self.acquire_with_dependencies(request).await);
        }
        outcome.merge(self.fetch_remote(remote, registry).await);

        self.log_sink.info(
            LogStream::Download,
            &format!(
                "Acquisition finished: {} attempted, {} downloaded, {} failed, {} duplicates skipped",
                outcome.attempted, outcome.downloaded, outcome.failed, outcome.duplicates
            ),
        );
        outcome
    }

    async fn acquire_with_dependencies(&self, request: &PackageRequest) -> AcquisitionOutcome {
        let mut outcome = AcquisitionOutcome::default();
        if !self.run.claim(request) {
            outcome.duplicates += 1;
            self.log_sink.info(
                LogStream::Download,
                &format!("Skipping {}: already downloaded in this run", request.dedup_key()),
            );
            return outcome;
        }

        for dependency in self.resolve_dependencies(request.identifier()).await {
            if dependency == request.identifier() {
                continue;
            }
            let dependency_request =
                match PackageRequest::new(PackageSource::PackageManager, dependency.clone(), None) {
                    Ok(dependency_request) => dependency_request,
                    Err(e) => {
                        self.log_sink.warning(
                            LogStream::Download,
                            &format!("Ignoring dependency '{}' of {}: {}", dependency, request, e),
                        );
                        continue;
                    }
                };
            if !self.run.claim(&dependency_request) {
                outcome.duplicates += 1;
                continue;
            }
            outcome.merge(self.download_with_retries(&dependency_request).await);
        }

        outcome.merge(self.download_with_retries(request).await);
        outcome
    }

    /// Recursive dependency names from `apt-rdepends`; empty on failure
    async fn resolve_dependencies(&self, package: &str) -> Vec<String> {
        let command = CommandSpec::new(&self.settings.tools.apt_rdepends).arg(package);
        match self.command_runner.invoke(&command).await {
            Ok(output) if output.success() => {
                let dependencies = DependencyParser::parse(&output.stdout);
                self.log_sink.info(
                    LogStream::Download,
                    &format!("{} has {} recursive dependencies", package, dependencies.len()),
                );
                dependencies
            }
            Ok(output) => {
                self.log_sink.warning(
                    LogStream::Download,
                    &format!(
                        "Could not resolve dependencies of {}: {}",
                        package,
                        output.failure_detail()
                    ),
                );
                Vec::new()
            }
            Err(e) => {
                self.log_sink.warning(
                    LogStream::Download,
                    &format!("Could not resolve dependencies of {}: {:#}", package, e),
                );
                Vec::new()
            }
        }
    }

    async fn download_with_retries(&self, request: &PackageRequest) -> AcquisitionOutcome {
        let mut outcome = AcquisitionOutcome {
            attempted: 1,
            ..Default::default()
        };
        let package = request.dedup_key();
        let max_attempts = self.settings.retries.max(1);

        for attempt in 1..=max_attempts {
            let command = CommandSpec::new(&self.settings.tools.apt_get)
                .args(["download", package.as_str()])
                .current_dir(&self.settings.work_dir);

            let failure = match self.command_runner.invoke(&command).await {
                Ok(output) if output.success() => None,
                Ok(output) => Some(output.failure_detail()),
                Err(e) => Some(format!("{:#}", e)),
            };

            match failure {
                None => {
                    self.log_sink
                        .info(LogStream::Download, &format!("Downloaded {}", package));
                    outcome.downloaded = 1;
                    let moved = self.relocate();
                    outcome.relocated = moved.len();
                    outcome.origins = moved
                        .into_iter()
                        .map(|path| (path, request.clone()))
                        .collect();
                    return outcome;
                }
                Some(detail) => {
                    self.log_sink.warning(
                        LogStream::Download,
                        &format!(
                            "Attempt {}/{} to download {} failed: {}",
                            attempt, max_attempts, package, detail
                        ),
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.settings.retry_delay).await;
                    }
                }
            }
        }

        self.log_sink.error(
            LogStream::Download,
            &format!("Failed to download {} after {} attempts", package, max_attempts),
        );
        outcome.failed = 1;
        outcome
    }

    /// Sweeps the package cache and work directory into the packages directory
    fn relocate(&self) -> Vec<std::path::PathBuf> {
        let target = &self.run.layout().packages_dir;
        match self
            .artifact_store
            .relocate(&self.settings.relocation_sources(), target)
        {
            Ok(relocation) => {
                for (path, reason) in &relocation.skipped {
                    self.log_sink.warning(
                        LogStream::Download,
                        &format!("Left {} in place: {}", path.display(), reason),
                    );
                }
                for path in &relocation.moved {
                    self.log_sink
                        .info(LogStream::Download, &format!("Moved {}", path.display()));
                }
                relocation.moved
            }
            Err(e) => {
                self.log_sink.error(
                    LogStream::Download,
                    &format!("Failed to relocate package archives: {:#}", e),
                );
                Vec::new()
            }
        }
    }

    async fn fetch_remote(
        &self,
        requests: Vec<PackageRequest>,
        registry: &RepositoryRegistry,
    ) -> AcquisitionOutcome {
        let total = requests.len();
        if total == 0 {
            return AcquisitionOutcome::default();
        }
        let completed = AtomicUsize::new(0);

        let outcomes: Vec<AcquisitionOutcome> = stream::iter(requests)
            .map(|request| {
                let completed = &completed;
                async move {
                    let outcome = self.fetch_one(&request, registry).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    self.progress_reporter.report_progress(
                        done,
                        total,
                        Some(&format!("downloaded {}", request.identifier())),
                    );
                    outcome
                }
            })
            .buffer_unordered(self.settings.workers.max(1))
            .collect()
            .await;

        let mut merged = AcquisitionOutcome::default();
        for outcome in outcomes {
            merged.merge(outcome);
        }
        merged
    }

    async fn fetch_one(
        &self,
        request: &PackageRequest,
        registry: &RepositoryRegistry,
    ) -> AcquisitionOutcome {
        let mut outcome = AcquisitionOutcome::default();
        if !self.run.claim(request) {
            outcome.duplicates = 1;
            self.log_sink.info(
                LogStream::Download,
                &format!("Skipping {}: already downloaded in this run", request.dedup_key()),
            );
            return outcome;
        }
        outcome.attempted = 1;

        let url = match self.resolve_url(request, registry) {
            Ok(url) => url,
            Err(reason) => {
                self.log_sink.error(
                    LogStream::Download,
                    &format!("Cannot download {}: {}", request, reason),
                );
                outcome.failed = 1;
                return outcome;
            }
        };
        let Some(file_name) = UrlBuilder::basename(&url) else {
            self.log_sink.error(
                LogStream::Download,
                &format!("Cannot derive a file name from {}", url),
            );
            outcome.failed = 1;
            return outcome;
        };

        self.log_sink
            .info(LogStream::Download, &format!("Downloading {}", url));
        let stored = match self.http_fetcher.fetch(&url).await {
            Ok(bytes) => self.artifact_store.store(
                &self.run.layout().packages_dir,
                file_name,
                &bytes,
            ),
            Err(e) => Err(e),
        };

        match stored {
            Ok(path) => {
                self.log_sink.info(
                    LogStream::Download,
                    &format!("Saved {} to {}", url, path.display()),
                );
                outcome.downloaded = 1;
                outcome.origins.push((path, request.clone()));
            }
            Err(e) => {
                self.log_sink
                    .error(LogStream::Download, &format!("{:#}", e));
                outcome.failed = 1;
            }
        }
        outcome
    }

    fn resolve_url(
        &self,
        request: &PackageRequest,
        registry: &RepositoryRegistry,
    ) -> std::result::Result<String, String> {
        match request.source() {
            PackageSource::Repository(name) => registry
                .get(name)
                .map(|entry| UrlBuilder::join(entry.download_base(), request.identifier()))
                .ok_or_else(|| format!("repository '{}' is not registered", name)),
            PackageSource::DirectUrl => Ok(request.identifier().to_string()),
            PackageSource::DirectFilename => self
                .settings
                .base_url
                .as_deref()
                .map(|base| UrlBuilder::join(base, request.identifier()))
                .ok_or_else(|| "BASE_URL is not set".to_string()),
            PackageSource::PinnedRelease(_) => match request.version() {
                Some(version) => Ok(UrlBuilder::release_url(
                    &self.settings.release_url_template,
                    version,
                )),
                None => Err("pinned release requests need a version".to_string()),
            },
            PackageSource::PackageManager => {
                Err("package-manager requests are not fetched over HTTP".to_string())
            }
        }
    }
}
