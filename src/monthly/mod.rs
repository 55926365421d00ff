pub mod aggregate;
pub mod commit;
pub mod exec;
pub mod output;

pub use aggregate::aggregate_monthly;
pub use commit::{commits_for_month, MonthCommit};
pub use exec::exec;
pub use output::{output_histogram, output_json, output_month, output_ndjson};
