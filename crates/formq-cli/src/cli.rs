use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "formq")]
#[command(about = "Submit visitor forms and keep them queued while offline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local queue database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name holding endpoint configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Override the submission endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds for deliveries (0 disables the timeout)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Ring the terminal bell when a submission is confirmed
    #[arg(long, global = true)]
    pub bell: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a form, queueing it when delivery is not possible
    #[command(alias = "send")]
    Submit {
        /// Form field as NAME=VALUE (repeatable)
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// File attachment as FIELD=PATH (repeatable)
        #[arg(short, long = "attach", value_name = "FIELD=PATH")]
        attachments: Vec<String>,
        /// Queue without attempting delivery
        #[arg(long)]
        offline: bool,
    },
    /// Inspect or clear queued submissions
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Deliver queued submissions now
    Resync {
        /// Output the pass report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Watch connectivity and resync whenever the endpoint becomes reachable
    Watch {
        /// Seconds between connectivity probes
        #[arg(short, long, default_value = "30")]
        interval: u64,
    },
    /// List states, or the cities of one state
    Regions {
        /// Country to list states for
        #[arg(long, default_value = formq_core::form::DEFAULT_COUNTRY)]
        country: String,
        /// State to list cities for
        #[arg(long)]
        state: Option<String>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// List queued submissions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every queued submission
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Submission endpoint URL
        #[arg(long, value_name = "URL")]
        set_endpoint: Option<String>,
        /// Request timeout in seconds stored in the profile
        #[arg(long, value_name = "SECS")]
        set_timeout: Option<u64>,
        /// Payload encoding
        #[arg(long, value_enum)]
        encoding: Option<EncodingArg>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the resolved profile
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum EncodingArg {
    Multipart,
    Urlencoded,
}

impl From<EncodingArg> for formq_core::config::FormEncoding {
    fn from(value: EncodingArg) -> Self {
        match value {
            EncodingArg::Multipart => Self::Multipart,
            EncodingArg::Urlencoded => Self::UrlEncoded,
        }
    }
}

