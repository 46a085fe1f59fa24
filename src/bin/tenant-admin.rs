use clap::Parser;
use tenant_admin::cli::utils::{output_error, PageError};
use tenant_admin::cli::{Cli, OutputFormat};
use tenant_admin::error::ApiError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so API_BASE_URL and friends apply to local runs
    let _ = dotenvy::dotenv();

    let default_level = if tenant_admin::is_development!() { "tenant_admin=debug" } else { "tenant_admin=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);
    tracing::debug!("Running in {:?} mode", tenant_admin::config::config().environment);

    if let Err(e) = tenant_admin::cli::run(cli).await {
        match output_format {
            OutputFormat::Json => output_error(&output_format, &e.to_string(), error_code(&e))?,
            OutputFormat::Text => match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}

fn error_code(e: &anyhow::Error) -> Option<&'static str> {
    if let Some(page) = e.downcast_ref::<PageError>() {
        return page.code;
    }
    e.downcast_ref::<ApiError>().map(|api| api.error_code())
}
