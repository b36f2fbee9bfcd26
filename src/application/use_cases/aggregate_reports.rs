use crate::application::dto::{PipelineSettings, ReportOutcome};
use crate::application::PipelineRun;
use crate::package_audit::domain::ArtifactReport;
use crate::package_audit::services::{ReportPrompt, ScanTally};
use crate::ports::outbound::{
    LogSink, LogStream, MetadataTableWriter, ScanSummaryFormatter, SummaryGenerator,
    TextFileWriter,
};
use crate::shared::Result;
use std::path::PathBuf;

/// AggregateReportsUseCase - writes the run's reports
///
/// The metadata spreadsheet and the scan summary are always attempted. The
/// language-model report is optional: when it is disabled, unconfigured or
/// fails, the failure is logged and the other reports are unaffected.
pub struct AggregateReportsUseCase<'a, MW, SF, TW, SG, LS> {
    table_writer: &'a MW,
    summary_formatter: &'a SF,
    text_writer: &'a TW,
    summary_generator: Option<&'a SG>,
    log_sink: &'a LS,
    settings: &'a PipelineSettings,
    run: &'a PipelineRun,
}

impl<'a, MW, SF, TW, SG, LS> AggregateReportsUseCase<'a, MW, SF, TW, SG, LS>
where
    MW: MetadataTableWriter,
    SF: ScanSummaryFormatter,
    TW: TextFileWriter,
    SG: SummaryGenerator,
    LS: LogSink,
{
    pub fn new(
        table_writer: &'a MW,
        summary_formatter: &'a SF,
        text_writer: &'a TW,
        summary_generator: Option<&'a SG>,
        log_sink: &'a LS,
        settings: &'a PipelineSettings,
        run: &'a PipelineRun,
    ) -> Self {
        Self {
            table_writer,
            summary_formatter,
            text_writer,
            summary_generator,
            log_sink,
            settings,
            run,
        }
    }

    pub async fn execute(&self, reports: &[ArtifactReport]) -> (ScanTally, ReportOutcome) {
        let tally = ScanTally::from_reports(reports);
        let mut outcome = ReportOutcome::default();

        let mut rows = self.run.metadata_rows();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));

        let table_path = self.run.layout().metadata_table_path();
        match self.table_writer.write_table(&rows, &table_path) {
            Ok(()) => {
                self.log_sink.info(
                    LogStream::Report,
                    &format!(
                        "Wrote {} metadata row(s) to {}",
                        rows.len(),
                        table_path.display()
                    ),
                );
                outcome.metadata_table = Some(table_path);
            }
            Err(e) => self.log_sink.error(
                LogStream::Report,
                &format!("Failed to write metadata table: {:#}", e),
            ),
        }

        match self.write_scan_summary(&tally, reports) {
            Ok(path) => {
                self.log_sink.info(
                    LogStream::Report,
                    &format!("Wrote scan summary to {}", path.display()),
                );
                outcome.scan_summary = Some(path);
            }
            Err(e) => self.log_sink.error(
                LogStream::Report,
                &format!("Failed to write scan summary: {:#}", e),
            ),
        }

        if self.settings.llm_report {
            outcome.llm_report = self.write_llm_report(&tally, reports).await;
        }

        (tally, outcome)
    }

    fn write_scan_summary(&self, tally: &ScanTally, reports: &[ArtifactReport]) -> Result<PathBuf> {
        let path = self.run.layout().scan_summary_path();
        let content = self.summary_formatter.format(tally, reports)?;
        self.text_writer.write_text(&path, &content)?;
        Ok(path)
    }

    async fn write_llm_report(
        &self,
        tally: &ScanTally,
        reports: &[ArtifactReport],
    ) -> Option<PathBuf> {
        let Some(generator) = self.summary_generator else {
            self.log_sink.warning(
                LogStream::Report,
                "OPENAI_API_KEY is not set; skipping the language-model report",
            );
            return None;
        };

        let prompt = ReportPrompt::build(tally, reports);
        let path = self.run.layout().llm_report_path();
        let written = match generator.generate(&prompt).await {
            Ok(text) => self.text_writer.write_text(&path, &text),
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => {
                self.log_sink.info(
                    LogStream::Report,
                    &format!("Wrote language-model report to {}", path.display()),
                );
                Some(path)
            }
            Err(e) => {
                self.log_sink.error(
                    LogStream::Report,
                    &format!("Language-model report failed: {:#}", e),
                );
                None
            }
        }
    }
}
