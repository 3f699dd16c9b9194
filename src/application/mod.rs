//! Application layer - Use cases that coordinate the domain modules.
//!
//! Use cases take their collaborators by reference so the CLI layer can build
//! real implementations and tests can pass mocks.

mod download;
mod search;
mod transfer;
mod update;

pub use download::{DownloadReport, DownloadUseCase};
pub use search::SearchQuery;
pub use transfer::{MAX_CONCURRENT_DOWNLOADS, Transfer, TransferOutcome, TransferResult};
pub use update::{UpdateReport, UpdateUseCase};
