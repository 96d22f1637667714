use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataFusionError {
    /// Raised by the engine itself; passed through untouched.
    #[error(transparent)]
    Engine(#[from] datafusion::error::DataFusionError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Coarse failure categories for a CSV load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unreadable,
    Malformed,
    Engine,
    Other,
}

impl DataFusionError {
    /// Classifies the error without altering it. Engine errors are inspected
    /// at their root, past any context wrappers DataFusion added.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataFusionError::Engine(e) => classify_engine(e.find_root()),
            DataFusionError::Arrow(e) => classify_arrow(e),
            DataFusionError::Io(e) => classify_io(e),
            DataFusionError::InvalidPath(_) => ErrorKind::Unreadable,
            DataFusionError::TableNotFound(_) => ErrorKind::NotFound,
            DataFusionError::Conversion(_) => ErrorKind::Other,
        }
    }
}

fn classify_engine(e: &datafusion::error::DataFusionError) -> ErrorKind {
    use datafusion::error::DataFusionError as Df;

    match e {
        Df::ObjectStore(object_store::Error::NotFound { .. }) => ErrorKind::NotFound,
        Df::ObjectStore(_) => ErrorKind::Unreadable,
        Df::IoError(io) => classify_io(io),
        Df::ArrowError(arrow, ..) => classify_arrow(arrow),
        _ => ErrorKind::Engine,
    }
}

fn classify_arrow(e: &arrow::error::ArrowError) -> ErrorKind {
    use arrow::error::ArrowError;

    match e {
        ArrowError::CsvError(_) | ArrowError::ParseError(_) | ArrowError::CastError(_) => {
            ErrorKind::Malformed
        }
        ArrowError::IoError(_, io) => classify_io(io),
        _ => ErrorKind::Other,
    }
}

fn classify_io(e: &std::io::Error) -> ErrorKind {
    match e.kind() {
        std::io::ErrorKind::NotFound => ErrorKind::NotFound,
        std::io::ErrorKind::InvalidData => ErrorKind::Malformed,
        _ => ErrorKind::Unreadable,
    }
}

pub type Result<T> = std::result::Result<T, DataFusionError>;
