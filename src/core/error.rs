/// Failures of the analysis pipeline.
///
/// Raised synchronously at the point of detection; a run never retries, so
/// any of these aborts the whole pipeline.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("the dataset contains no readings")]
    EmptyDataset,

    /// A projection over a zero-length period, which would divide by zero.
    #[error("the analysis period is empty")]
    InvalidPeriod,
}
