//! Shroud CLI: command-line client for the Shroud anonymization service.
//!
//! Set SHROUD_API_URL (or API_URL). The bearer token is kept in SHROUD_TOKEN_PATH
//! between invocations.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shroud_api_client::{ApiClient, ServiceApi};
use shroud_cli::{print_json, read_source_file, truncate_string};
use shroud_core::validation::password_strength;
use shroud_core::{ClientConfig, JobStatus, SourceFile};
use shroud_infra::{init_telemetry, shutdown_telemetry, LogFormat};
use shroud_services::{
    FileTokenStore, SessionManager, SubmitOutcome, TokenStore, UploadController,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "shroud", about = "Shroud face anonymization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the profile of the signed-in user
    Whoami,
    /// Check that the service answers
    Ping,
    /// Upload an image and blur every detected face
    Upload {
        /// Path to the image
        file: PathBuf,
        /// Override the content type guessed from the extension
        #[arg(long)]
        content_type: Option<String>,
        /// Save the processed image to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    init_telemetry("shroud", LogFormat::parse(&config.log_format))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.is_production() && config.api_url.starts_with("http://") {
        tracing::warn!(
            api_url = %config.api_url,
            "Bearer tokens will be sent over plain HTTP"
        );
    }

    let client = ApiClient::from_config(&config).context(
        "Failed to create API client. Check SHROUD_API_URL and SHROUD_HTTP_TIMEOUT_SECS",
    )?;
    let api: Arc<dyn ServiceApi> = Arc::new(client.clone());
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_path));
    let mut session = SessionManager::load(Arc::clone(&api), store)
        .await
        .with_context(|| format!("Failed to load session from {}", config.token_path.display()))?;

    let succeeded = match cli.command {
        Commands::Login { email, password } => match session.login(&email, &password).await {
            Ok(established) => {
                println!("Signed in as {}", established.profile.name);
                print_json(&established.profile)?;
                true
            }
            Err(e) => {
                eprintln!("{}", e.login_message());
                false
            }
        },
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let strength = password_strength(&password);
            println!(
                "Password strength: {:?} ({}%)",
                strength.level, strength.score
            );
            match session
                .register(&name, &email, &password, &confirm_password)
                .await
            {
                Ok(established) => {
                    println!("Registered and signed in as {}", established.profile.name);
                    print_json(&established.profile)?;
                    true
                }
                Err(e) => {
                    eprintln!("{}", e.registration_message());
                    false
                }
            }
        }
        Commands::Logout => {
            session.logout();
            println!("Signed out");
            true
        }
        Commands::Whoami => match session.refresh_profile().await {
            Ok(refreshed) => {
                print_json(&refreshed.profile)?;
                true
            }
            Err(e) => {
                eprintln!("{}", e.upload_message());
                false
            }
        },
        Commands::Ping => match client.ping().await {
            Ok(health) => {
                print_json(&health)?;
                true
            }
            Err(e) => {
                eprintln!("{}", e.upload_message());
                false
            }
        },
        Commands::Upload {
            file,
            content_type,
            output,
        } => {
            let source = read_source_file(&file, content_type).await?;
            upload(&client, &api, &mut session, source, output).await?
        }
    };

    session.save().await.with_context(|| {
        format!("Failed to save session to {}", config.token_path.display())
    })?;
    shutdown_telemetry();

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn upload(
    client: &ApiClient,
    api: &Arc<dyn ServiceApi>,
    session: &mut SessionManager,
    source: SourceFile,
    output: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let mut uploads = UploadController::new(Arc::clone(api));

    if let Err(e) = uploads.select_file(source) {
        eprintln!("{}", e.upload_message());
        return Ok(false);
    }

    if let Some(job) = uploads.job() {
        println!(
            "Uploading {} ({})",
            truncate_string(&job.source.file_name, 48),
            job.source.size_label()
        );
    }

    let outcome = uploads.submit(session).await;
    print_json(&uploads.display())?;

    match outcome {
        SubmitOutcome::Finished(JobStatus::Succeeded) => {
            if let Some(message) = uploads.status_message() {
                println!("{}", message);
            }
            let location = uploads
                .job()
                .and_then(|job| job.processed_asset_url.clone());
            if let (Some(path), Some(location)) = (output, location) {
                match client.download(&location).await {
                    Ok(bytes) => {
                        tokio::fs::write(&path, &bytes)
                            .await
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        println!("Saved {}", path.display());
                    }
                    Err(e) => {
                        eprintln!("Download failed: {}", e.upload_message());
                        return Ok(false);
                    }
                }
            }
            Ok(true)
        }
        SubmitOutcome::Finished(_) => {
            if let Some(message) = uploads.status_message() {
                eprintln!("{}", message);
            }
            Ok(false)
        }
        SubmitOutcome::Skipped(e) => {
            eprintln!("{}", e.upload_message());
            Ok(false)
        }
        SubmitOutcome::Discarded(job_id) => {
            tracing::warn!(%job_id, "Transfer result discarded");
            Ok(false)
        }
    }
}
