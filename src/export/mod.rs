pub mod exporter;
pub mod file;
pub mod format;
pub mod store;

pub use exporter::{ExportOutcome, Exporter, MANUAL_RETRIEVAL_NOTICE};
pub use file::SensorDataFile;
pub use format::{render, EXPORT_FILE_NAME, HEADER};
pub use store::{FileStore, LocalFileStore, ShareTarget, Unavailable};
