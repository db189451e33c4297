use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ttlmemo::cli::commands::{self, load_config};
use ttlmemo::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = load_config(&cli.config);

    // Determine log level: CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("ttlmemo={}", log_level)
            .parse()
            .unwrap_or_else(|_| "ttlmemo=info".parse().expect("fallback directive is valid")),
    );

    let json = config.general.log_format.eq_ignore_ascii_case("json");
    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(filter)
        .init();

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    let prefix = cli.prefix.as_deref();
    match cli.command {
        Commands::Init { path } => commands::init(path)?,
        Commands::Key {
            args,
            kwargs,
            method,
        } => commands::key(&args, &kwargs, method)?,
        Commands::Show { key } => commands::show(&key, prefix, &config)?,
        Commands::List => commands::list(prefix, &config)?,
        Commands::Expire { key } => commands::expire(key.as_deref(), prefix, &config)?,
        Commands::Delete { key } => commands::delete(&key, prefix, &config)?,
        Commands::Clear => commands::clear(prefix, &config)?,
        Commands::Version => commands::version(),
    }

    Ok(())
}
