use clap::Parser;
use clpctl::adapter::inbound::cli::command::{Cli, ColorChoice, Commands, ConfigCommand};
use clpctl::adapter::inbound::cli::context::Context;
use clpctl::adapter::inbound::cli::output::{self, OutputConfig};
use clpctl::adapter::inbound::cli::{config, dispatch, start, status, stop};
use clpctl::error::Result;
use clpctl::infrastructure::config::logging::LoggingConfig;
use tracing::debug;

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    match cli.color {
        ColorChoice::Auto => {}
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }

    let ctx = match Context::load(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            LoggingConfig::default()
                .with_overrides(cli.verbose, cli.json)
                .init();
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };
    ctx.spec
        .logging
        .clone()
        .with_overrides(cli.verbose, cli.json)
        .init();
    debug!(cluster = %ctx.spec.name, "clpctl starting");

    if let Err(e) = run(&cli, &ctx) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli, ctx: &Context) -> Result<()> {
    match &cli.command {
        Commands::Start(args) => start::execute(ctx, args),
        Commands::Stop => stop::execute(ctx),
        Commands::Status => status::execute(ctx),
        Commands::Compress(args) => dispatch::execute_compress(ctx, args),
        Commands::Decompress(args) => dispatch::execute_decompress(ctx, args),
        Commands::Search(args) => dispatch::execute_search(ctx, args),
        Commands::Config(ConfigCommand::Show) => config::execute_show(ctx),
    }
}
