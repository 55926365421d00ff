use crate::collect::CollectArgs;
use crate::forge::client::{CollectConfig, DEFAULT_API_URL, DEFAULT_ORG};
use crate::monthly::exec::MonthlyArgs;
use crate::scale::{DisplayOrder, ScaleScope, ValueMode, ViewState};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_PATH: &str = "docs/data/codes_data.json";

#[derive(Parser)]
#[command(name = "codes-timeline")]
#[command(about = "Commit history of the French legislative codes, collected and aggregated for charting")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, env = "CODES_DATA", default_value = DEFAULT_DATA_PATH, help = "Path of the dataset JSON document")]
    pub data: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every repository's commits and write the dataset document
    Collect {
        #[arg(long, env = "CODES_API_URL", default_value = DEFAULT_API_URL, help = "Forgejo API base URL")]
        api_url: String,

        #[arg(long, env = "CODES_ORG", default_value = DEFAULT_ORG, help = "Organisation owning the code repositories")]
        org: String,

        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..=32), help = "Repositories fetched in parallel")]
        jobs: u16,

        #[arg(long, default_value = "300ms", value_parser = humantime::parse_duration, help = "Pause after each API request")]
        delay: Duration,

        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=10), help = "Attempts per request")]
        retries: u32,

        #[arg(long, help = "Only collect the first N repositories")]
        limit: Option<usize>,

        #[arg(long, help = "Hide the progress bar")]
        no_progress: bool,
    },
    /// Additions and deletions per calendar month, across all codes
    Monthly {
        #[arg(long, conflicts_with = "ndjson", help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Show additions minus deletions")]
        net: bool,

        #[arg(long, default_value_t = 3, help = "Codes (or commits with --month) listed per month")]
        top: usize,

        #[arg(long, conflicts_with = "ndjson", help = "Detail a single month (YYYY-MM)")]
        month: Option<String>,
    },
    /// Per-code totals with the scale each chart would use
    Summary {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, value_enum, default_value_t = ScaleScope::Global)]
        scope: ScaleScope,

        #[arg(long, value_enum, default_value_t = DisplayOrder::ModificationScore)]
        order: DisplayOrder,

        #[arg(long, help = "Scale on additions minus deletions")]
        net: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Collect {
                api_url,
                org,
                jobs,
                delay,
                retries,
                limit,
                no_progress,
            } => {
                let config = CollectConfig {
                    api_url,
                    org,
                    delay,
                    retries,
                    ..CollectConfig::default()
                };
                crate::collect::exec(
                    self.common,
                    CollectArgs {
                        config,
                        jobs: jobs as usize,
                        limit,
                        progress: !no_progress,
                    },
                )
            }
            Commands::Monthly { json, ndjson, net, top, month } => crate::monthly::exec(
                self.common,
                MonthlyArgs {
                    json,
                    ndjson,
                    net,
                    top,
                    month,
                },
            ),
            Commands::Summary { json, scope, order, net } => {
                let view = ViewState {
                    scope,
                    order,
                    mode: if net { ValueMode::Net } else { ValueMode::Gross },
                };
                crate::summary::exec(self.common, view, json)
            }
        }
    }
}
