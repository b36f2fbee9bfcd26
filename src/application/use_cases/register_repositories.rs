use crate::application::dto::PipelineSettings;
use crate::package_audit::domain::{RepositoryEntry, RepositoryRegistry};
use crate::package_audit::services::SourcesEntry;
use crate::ports::outbound::{
    ArtifactStore, CommandRunner, CommandSpec, HttpFetcher, LogSink, LogStream, TextFileWriter,
};
use crate::shared::security::validate_plain_file_name;
use crate::shared::Result;
use anyhow::Context;

/// What source registration did for a registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub registered: usize,
    pub failed: usize,
    pub package_lists_updated: bool,
}

/// RegisterRepositoriesUseCase - makes listed repositories visible to apt
///
/// For each entry: fetch its signing key when one is listed, write
/// `<sources_dir>/<name>.list`, then refresh the package lists once.
/// Every failure is logged against its entry and never stops the run.
pub struct RegisterRepositoriesUseCase<'a, CR, HF, AS, TW, LS> {
    command_runner: &'a CR,
    http_fetcher: &'a HF,
    artifact_store: &'a AS,
    text_writer: &'a TW,
    log_sink: &'a LS,
    settings: &'a PipelineSettings,
}

impl<'a, CR, HF, AS, TW, LS> RegisterRepositoriesUseCase<'a, CR, HF, AS, TW, LS>
where
    CR: CommandRunner,
    HF: HttpFetcher,
    AS: ArtifactStore,
    TW: TextFileWriter,
    LS: LogSink,
{
    pub fn new(
        command_runner: &'a CR,
        http_fetcher: &'a HF,
        artifact_store: &'a AS,
        text_writer: &'a TW,
        log_sink: &'a LS,
        settings: &'a PipelineSettings,
    ) -> Self {
        Self {
            command_runner,
            http_fetcher,
            artifact_store,
            text_writer,
            log_sink,
            settings,
        }
    }

    pub async fn execute(&self, registry: &RepositoryRegistry) -> RegistrationOutcome {
        let mut outcome = RegistrationOutcome::default();
        if registry.is_empty() {
            return outcome;
        }

        let mut system_codename: Option<String> = None;
        for entry in registry.entries() {
            match self.register(entry, &mut system_codename).await {
                Ok(line) => {
                    outcome.registered += 1;
                    self.log_sink.info(
                        LogStream::Download,
                        &format!("Registered repository {}: {}", entry.name, line),
                    );
                }
                Err(e) => {
                    outcome.failed += 1;
                    self.log_sink.error(
                        LogStream::Download,
                        &format!("Failed to register repository {}: {:#}", entry.name, e),
                    );
                }
            }
        }

        if outcome.registered > 0 {
            outcome.package_lists_updated = self.update_package_lists().await;
        }
        outcome
    }

    async fn register(
        &self,
        entry: &RepositoryEntry,
        system_codename: &mut Option<String>,
    ) -> Result<String> {
        validate_plain_file_name(&entry.name)
            .with_context(|| format!("repository name '{}' cannot name its files", entry.name))?;

        let keyring = match &entry.signing_key_url {
            Some(key_url) => {
                self.log_sink.info(
                    LogStream::Download,
                    &format!("Adding GPG key for {} from {}", entry.name, key_url),
                );
                let key = self.http_fetcher.fetch(key_url).await?;
                let path = self.artifact_store.store(
                    &self.settings.apt.keyring_dir,
                    &format!("{}-archive-keyring.gpg", entry.name),
                    &key,
                )?;
                Some(path)
            }
            None => None,
        };

        let codename = if entry.is_source_entry() {
            String::new()
        } else {
            self.resolve_codename(entry, system_codename).await?
        };

        let line = SourcesEntry::render(entry, keyring.as_deref(), &codename);
        let list_path = self
            .settings
            .apt
            .sources_dir
            .join(format!("{}.list", entry.name));
        self.text_writer
            .write_text(&list_path, &format!("{}\n", line))
            .with_context(|| format!("writing {}", list_path.display()))?;
        Ok(line)
    }

    /// Entry override, then the configured default, then `lsb_release -cs`
    async fn resolve_codename(
        &self,
        entry: &RepositoryEntry,
        system_codename: &mut Option<String>,
    ) -> Result<String> {
        if let Some(codename) = entry
            .codename_override
            .as_ref()
            .or(self.settings.default_codename.as_ref())
        {
            return Ok(codename.clone());
        }
        if let Some(codename) = system_codename {
            return Ok(codename.clone());
        }

        let command = CommandSpec::new(&self.settings.tools.lsb_release).arg("-cs");
        let output = self.command_runner.invoke(&command).await?;
        let codename = output.stdout.trim().to_string();
        if !output.success() || codename.is_empty() {
            anyhow::bail!(
                "could not determine the distribution codename: {}",
                output.failure_detail()
            );
        }
        *system_codename = Some(codename.clone());
        Ok(codename)
    }

    async fn update_package_lists(&self) -> bool {
        self.log_sink
            .info(LogStream::Download, "Updating package lists...");
        let command = CommandSpec::new(&self.settings.tools.apt_get)
            .arg("update")
            .privileged(self.settings.use_sudo);

        match self.command_runner.invoke(&command).await {
            Ok(output) if output.success() => {
                self.log_sink
                    .info(LogStream::Download, "Package lists updated.");
                true
            }
            Ok(output) => {
                self.log_sink.error(
                    LogStream::Download,
                    &format!("Failed to update package lists: {}", output.failure_detail()),
                );
                false
            }
            Err(e) => {
                self.log_sink.error(
                    LogStream::Download,
                    &format!("Failed to update package lists: {:#}", e),
                );
                false
            }
        }
    }
}
