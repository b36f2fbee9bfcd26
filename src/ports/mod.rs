/// Ports module defining interfaces for hexagonal architecture
///
/// The pipeline is driven from the CLI directly, so only outbound (driven)
/// ports are defined: the infrastructure the application core depends on.
pub mod outbound;
