use thiserror::Error;

/// Failure while reconstructing a document. Any of these aborts the whole
/// reconstruction; no partial PDF is produced.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no usable font family (Arial, LiberationSans) in {0}")]
    FontsUnavailable(String),

    #[error("document rasterizer is not configured")]
    RasterizerUnavailable,

    #[error("section '{0}' rendered to an empty image")]
    EmptySection(&'static str),

    #[error("section would be {0} px tall; the record is too long to print")]
    SectionTooTall(u32),

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("PDF serialization failed: {0}")]
    Pdf(String),

    #[error("render task failed: {0}")]
    Task(String),
}
