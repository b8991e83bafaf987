use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = onebox::cli::Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = onebox::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// `-v` info, `-vv` debug, `-vvv` trace. `RUST_LOG` wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
