//! CLI subcommand handlers.

use crate::AnalyzeArgs;
use crate::Commands;
use crate::ConfigAction;
use crate::OutputFormat;
use crate::output;
use std::path::Path;
use std::process::ExitCode;
use thinklens_core::config::{self, ThinklensConfig};
use thinklens_core::mock_server::{self, MockState};
use thinklens_core::{
    HttpTransport, SubmissionController, SubmitOutcome, ThinkingMethod, render_page,
};
use tokio::io::AsyncReadExt;

const PAGE_TITLE: &str = "Thinklens Analysis";

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    config_path: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Analyze(args) => {
            let config = load(workspace, config_path)?;
            handle_analyze(args, config, quiet).await
        }
        Commands::MockServer { host, port } => {
            let config = load(workspace, config_path)?;
            handle_mock_server(config, host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            handle_config(action, workspace, config_path)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(workspace: &Path, config_path: Option<&Path>) -> anyhow::Result<ThinklensConfig> {
    match config_path {
        Some(path) => Ok(config::load_config_file(path)?),
        None => config::load_config(Some(workspace), None)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e)),
    }
}

async fn read_input(args: &AnalyzeArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(file) = &args.file {
        return tokio::fs::read_to_string(file)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e));
    }
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}

/// Reject method names the form has no checkbox for.
fn check_methods(methods: &[String]) -> anyhow::Result<()> {
    for method in methods {
        if ThinkingMethod::from_value(method).is_none() {
            let known: Vec<&str> = ThinkingMethod::ALL.iter().map(|m| m.value()).collect();
            anyhow::bail!(
                "Unknown thinking method '{}' (expected one of: {})",
                method,
                known.join(", ")
            );
        }
    }
    Ok(())
}

async fn handle_analyze(
    args: AnalyzeArgs,
    mut config: ThinklensConfig,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    check_methods(&args.methods)?;
    if let Some(server) = &args.server {
        config.client.base_url = server.clone();
    }
    let text = read_input(&args).await?;

    let transport = HttpTransport::new(&config.client)?;
    tracing::info!(url = transport.url(), "Submitting analysis request");
    let controller = SubmissionController::from_config(transport, &config);

    controller.with_form(|form| {
        form.set_text(text);
        form.set_use_ai(args.ai);
        if args.all {
            form.set_all(true);
        } else {
            for method in &args.methods {
                form.set_method(method, true);
            }
        }
    });

    let outcome = controller.submit().await;
    let view = controller.snapshot();

    for alert in &view.alerts {
        eprintln!("{}", output::format_alert(alert));
    }

    if let Some(out) = &args.out {
        tokio::fs::write(out, render_page(&view, PAGE_TITLE)).await?;
        if !quiet {
            eprintln!("Wrote {}", out.display());
        }
    }

    if outcome == SubmitOutcome::Rendered {
        let stdout = match args.format {
            OutputFormat::Text => controller
                .last_analysis()
                .map(|analysis| output::render_text(&analysis, view.processing_time_ms))
                .unwrap_or_default(),
            OutputFormat::Json => match controller.last_analysis() {
                Some(analysis) => serde_json::to_string_pretty(&analysis.raw)?,
                None => String::new(),
            },
            OutputFormat::Html => render_page(&view, PAGE_TITLE),
        };
        println!("{}", stdout.trim_end());
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::debug!(?outcome, "Analysis did not render");
        Ok(ExitCode::FAILURE)
    }
}

async fn handle_mock_server(
    config: ThinklensConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut server = config.mock_server.clone();
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    println!("Starting mock analysis service...");
    println!("  POST http://{}:{}/api/analyze", server.host, server.port);
    println!("  GET  http://{}:{}/health", server.host, server.port);
    println!();
    println!("Press Ctrl+C to stop.");

    mock_server::run(&server, MockState::new(config.limits.max_text_chars)).await?;
    Ok(())
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".thinklens");
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let toml_str = config::to_toml(&ThinklensConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load(workspace, config_path)?;
            println!("{}", config::to_toml(&config)?);
            Ok(())
        }
    }
}
