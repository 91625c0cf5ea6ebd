pub mod apify_client;
pub mod exporter;
pub mod job_runner;

pub use apify_client::*;
pub use exporter::*;
pub use job_runner::*;
