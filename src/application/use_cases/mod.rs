pub mod acquire_packages;
pub mod aggregate_reports;
pub mod process_artifacts;
pub mod register_repositories;
pub mod run_pipeline;

pub use acquire_packages::AcquirePackagesUseCase;
pub use aggregate_reports::AggregateReportsUseCase;
pub use process_artifacts::ProcessArtifactsUseCase;
pub use register_repositories::{RegisterRepositoriesUseCase, RegistrationOutcome};
pub use run_pipeline::{PipelineAdapters, RunPipelineUseCase};
