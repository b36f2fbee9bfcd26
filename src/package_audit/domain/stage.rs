use std::fmt;

/// Pipeline driver states
///
/// Transitions are sequential and unconditional; failures inside a stage
/// stay with the package or artifact that caused them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Init,
    RepositoriesLoaded,
    PackagesAcquired,
    ArtifactsRelocated,
    Processing,
    Aggregating,
    Done,
}

impl PipelineStage {
    /// The stage that follows this one; `Done` is terminal
    pub fn next(self) -> Self {
        match self {
            PipelineStage::Init => PipelineStage::RepositoriesLoaded,
            PipelineStage::RepositoriesLoaded => PipelineStage::PackagesAcquired,
            PipelineStage::PackagesAcquired => PipelineStage::ArtifactsRelocated,
            PipelineStage::ArtifactsRelocated => PipelineStage::Processing,
            PipelineStage::Processing => PipelineStage::Aggregating,
            PipelineStage::Aggregating => PipelineStage::Done,
            PipelineStage::Done => PipelineStage::Done,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == PipelineStage::Done
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Init => "Init",
            PipelineStage::RepositoriesLoaded => "RepositoriesLoaded",
            PipelineStage::PackagesAcquired => "PackagesAcquired",
            PipelineStage::ArtifactsRelocated => "ArtifactsRelocated",
            PipelineStage::Processing => "Processing",
            PipelineStage::Aggregating => "Aggregating",
            PipelineStage::Done => "Done",
        };
        write!(f, "{}", name)
    }
}
