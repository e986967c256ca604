pub mod info;
pub mod send;

use clap::{ArgAction, Parser, Subcommand};

use send::SendArgs;

#[derive(Parser)]
#[command(name = "icmpgen")]
#[command(about = "An ICMP echo traffic generator.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output (-q hides headers, -qq also hides the progress bar)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Do not listen for 'q' on the keyboard
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the source address and privileges probes would be sent with
    #[command(alias = "i")]
    Info,
    /// Send ICMP echo probes to a destination
    #[command(alias = "s")]
    Send(SendArgs),
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
