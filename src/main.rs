mod cli;
mod config;

use cli::Args;
use clap::Parser;
use config::{discover_config, load_config_from_path, ConfigFile};
use deb_sbom::adapters::outbound::archive::DebArchiveReader;
use deb_sbom::adapters::outbound::console::StderrProgressReporter;
use deb_sbom::adapters::outbound::filesystem::{
    FileLogSink, FileSystemArtifactStore, FileSystemReader, FileSystemWriter,
};
use deb_sbom::adapters::outbound::formatters::{MarkdownFormatter, XlsxMetadataWriter};
use deb_sbom::adapters::outbound::network::{OpenAiSummaryGenerator, ReqwestHttpFetcher};
use deb_sbom::adapters::outbound::process::SystemCommandRunner;
use deb_sbom::application::dto::{PipelineSettings, PipelineSummary};
use deb_sbom::application::use_cases::{PipelineAdapters, RunPipelineUseCase};
use deb_sbom::package_audit::domain::Severity;
use deb_sbom::shared::error::ExitCode;
use deb_sbom::shared::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_WORK_SUBDIR: &str = "apt_work";
const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(1800);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1";

/// Settings plus the adapter options that live outside the pipeline
struct RunOptions {
    settings: PipelineSettings,
    tool_timeout: Duration,
    http_timeout: Duration,
    llm_model: String,
    llm_endpoint: String,
    api_key: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    match run(args).await {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<PipelineSummary> {
    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(&std::env::current_dir()?)?.unwrap_or_default(),
    };
    let options = resolve_options(args, config);
    let settings = &options.settings;

    // Create adapters (Dependency Injection)
    let summary_generator = match (&options.api_key, settings.llm_report) {
        (Some(key), true) => Some(OpenAiSummaryGenerator::new(
            key.clone(),
            options.llm_model.clone(),
            options.llm_endpoint.clone(),
            options.http_timeout,
        )?),
        _ => None,
    };
    let adapters = PipelineAdapters {
        command_runner: SystemCommandRunner::new(options.tool_timeout),
        http_fetcher: ReqwestHttpFetcher::new(options.http_timeout)?,
        artifact_store: FileSystemArtifactStore::new(),
        input_reader: FileSystemReader::new(),
        text_writer: FileSystemWriter::new(),
        archive_reader: DebArchiveReader::new(),
        table_writer: XlsxMetadataWriter::new(),
        summary_formatter: MarkdownFormatter::new(),
        summary_generator,
        log_sink: FileLogSink::new(&settings.layout.log_dir),
        progress_reporter: StderrProgressReporter::new(),
    };

    let use_case = RunPipelineUseCase::new(adapters);
    use_case.execute(settings).await
}

/// Merges CLI and environment over the config file over built-in defaults
fn resolve_options(args: Args, config: ConfigFile) -> RunOptions {
    let output_dir = args
        .output_dir
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let work_dir = args
        .work_dir
        .or(config.work_dir)
        .unwrap_or_else(|| output_dir.join(DEFAULT_WORK_SUBDIR));

    let mut settings = PipelineSettings::new(&output_dir, work_dir);
    if let Some(log_dir) = args.log_dir.or(config.log_dir) {
        settings.layout = settings.layout.with_log_dir(log_dir);
    }

    // Config values were validated on load
    if let Some(mode) = args
        .mode
        .or_else(|| config.mode.as_deref().and_then(|mode| mode.parse().ok()))
    {
        settings.mode = mode;
    }
    if let Some(path) = args.manifest.or(config.manifest) {
        settings.manifest_path = path;
    }
    if let Some(path) = args.repos.or(config.repos) {
        settings.repository_list_path = path;
    }
    if let Some(path) = args.urls_file.or(config.urls_file) {
        settings.urls_file = path;
    }
    if let Some(path) = args.filenames_file.or(config.filenames_file) {
        settings.filenames_file = path;
    }
    settings.base_url = args
        .base_url
        .or(config.base_url)
        .filter(|url| !url.trim().is_empty());

    if let Some(workers) = args.workers.or(config.workers) {
        settings.workers = workers;
    }
    if let Some(retries) = args.retries.or(config.retries) {
        settings.retries = retries;
    }
    if let Some(secs) = config.retry_delay_secs {
        settings.retry_delay = Duration::from_secs(secs);
    }

    settings.malware_scan = !args.skip_malware_scan && config.malware_scan.unwrap_or(true);
    settings.register_sources =
        !args.skip_source_registration && config.register_sources.unwrap_or(true);
    settings.llm_report = args.llm_report || config.llm_report.unwrap_or(false);
    settings.use_sudo = args.sudo || config.sudo.unwrap_or(false);
    settings.chown_user = args.chown.or(config.chown);
    settings.default_codename = config.default_codename;
    if let Some(template) = config.release_url_template {
        settings.release_url_template = template;
    }

    if let Some(apt) = config.apt {
        if let Some(dir) = apt.cache_dir {
            settings.apt.cache_dir = dir;
        }
        if let Some(dir) = apt.sources_dir {
            settings.apt.sources_dir = dir;
        }
        if let Some(dir) = apt.keyring_dir {
            settings.apt.keyring_dir = dir;
        }
    }

    if let Some(tools) = config.tools {
        let names = &mut settings.tools;
        for (slot, value) in [
            (&mut names.apt_get, tools.apt_get),
            (&mut names.apt_rdepends, tools.apt_rdepends),
            (&mut names.trivy, tools.trivy),
            (&mut names.clamscan, tools.clamscan),
            (&mut names.freshclam, tools.freshclam),
            (&mut names.lsb_release, tools.lsb_release),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    let llm = config.llm.unwrap_or_default();
    RunOptions {
        settings,
        tool_timeout: config
            .tool_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOOL_TIMEOUT),
        http_timeout: config
            .http_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT),
        llm_model: llm.model.unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
        llm_endpoint: llm
            .endpoint
            .unwrap_or_else(|| DEFAULT_LLM_ENDPOINT.to_string()),
        api_key: args.openai_api_key.filter(|key| !key.trim().is_empty()),
    }
}

fn print_summary(summary: &PipelineSummary) {
    let acquisition = &summary.acquisition;
    let tally = &summary.tally;

    eprintln!();
    eprintln!("{}", "📦 Debian package audit".bold());
    eprintln!("   Run:          {} ({} mode)", summary.run_id, summary.mode);
    eprintln!(
        "   Requests:     {} ({} input line(s) skipped)",
        summary.requests, summary.rejected_lines
    );
    eprintln!(
        "   Downloads:    {} ok, {} failed, {} duplicate(s)",
        acquisition.downloaded.green(),
        acquisition.failed.red(),
        acquisition.duplicates
    );
    eprintln!(
        "   Artifacts:    {} (SBOM {} ok / {} failed)",
        tally.artifacts, tally.sboms_generated, tally.sboms_failed
    );

    let severities: Vec<String> = Severity::ALL
        .iter()
        .map(|severity| format!("{}={}", severity, tally.vulnerability_count(*severity)))
        .collect();
    eprintln!("   Findings:     {}", severities.join(", "));

    if tally.malware_infected > 0 {
        eprintln!(
            "   Malware:      {}",
            format!("{} infected artifact(s)", tally.malware_infected)
                .red()
                .bold()
        );
    } else {
        eprintln!(
            "   Malware:      {} clean, {} error(s), {} not scanned",
            tally.malware_clean, tally.malware_errors, tally.malware_not_scanned
        );
    }

    for path in [
        &summary.reports.metadata_table,
        &summary.reports.scan_summary,
        &summary.reports.llm_report,
    ]
    .into_iter()
    .flatten()
    {
        eprintln!("   Report:       {}", path.display().yellow());
    }
    eprintln!("   Finished at stage {}", summary.final_stage);
}
