use clap::{Parser, Subcommand};
use depthgate::scoring::Tier;
use std::path::PathBuf;

/// `depthgate` - conversation engagement and depth gating.
#[derive(Parser, Debug)]
#[command(name = "depthgate")]
#[command(version)]
#[command(about = "Score conversational depth and gate low-engagement sessions.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.depthgate/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run stdin lines through the engine as turns of one session
    Simulate {
        /// Client key the turns are attributed to
        #[arg(short, long, default_value = "anonymous")]
        key: String,

        /// Client tier (anonymous, free, premium)
        #[arg(short, long, default_value_t = Tier::Anonymous)]
        tier: Tier,
    },

    /// Score a single message and print the heuristic breakdown
    Score {
        message: String,

        /// Client tier used for the escalation decision
        #[arg(short, long, default_value_t = Tier::Anonymous)]
        tier: Tier,
    },

    /// Print the effective configuration as TOML
    Config,
}
