use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use barangay_id_verify::config::AppConfig;
use barangay_id_verify::services::{
    local_ocr::TesseractEngine, remote_ocr::RemoteOcrClient, upload, verifier::IdentityVerifier,
};

/// Verify an ID image from disk the same way the portal does.
///
/// Exit status: 0 when the locality was found, 1 when it was not,
/// 2 when verification was unavailable, 3 on usage or config errors.
#[derive(Parser)]
#[command(name = "verify-file")]
#[command(version)]
struct Cli {
    /// Path to a JPEG or PNG image of the ID
    path: PathBuf,

    /// Override the configured required locality
    #[arg(short, long)]
    locality: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "verify-file failed");
            eprintln!("error: {e}");
            ExitCode::from(3)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let locality = cli.locality.unwrap_or_else(|| config.required_locality.clone());

    let image = tokio::fs::read(&cli.path).await?;
    let format = upload::check_upload(&image, config.max_upload_bytes)?;
    tracing::info!(path = %cli.path.display(), format = ?format, "Verifying ID image");

    let remote = RemoteOcrClient::new(&config.remote_ocr_url, config.remote_timeout())?;
    let local = TesseractEngine::new(config.tesseract_config());
    let verifier = IdentityVerifier::new(Arc::new(remote), Arc::new(local))
        .with_language(&config.ocr_language);

    let result = verifier.verify(&image, &locality).await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");

    Ok(if !result.ok {
        ExitCode::from(2)
    } else if result.has_required_locality {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
