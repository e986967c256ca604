mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, send};
use icmpgen_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = Config {
        quiet: commands.quiet,
        disable_input: commands.no_input,
    };

    print::banner(cfg.quiet);

    match commands.command {
        Commands::Info => {
            print::header("about this host", cfg.quiet);
            info::info(&cfg)
        }
        Commands::Send(args) => {
            print::header("getting ready to send", cfg.quiet);
            send::send(args, &cfg).await
        }
    }
}
