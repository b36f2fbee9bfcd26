/// Application layer - Use cases, DTOs and run state
///
/// This layer contains the application logic that orchestrates
/// domain services and coordinates with infrastructure through ports.
pub mod dto;
pub mod run_context;
pub mod use_cases;

pub use run_context::PipelineRun;
