//! CLI entrypoint for asset-assistant
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use assistant_application::{ConversationLogger, LlmGateway, NoConversationLogger, RunTurnUseCase};
use assistant_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiGateway, PersonalizeClient,
    builtin_registry,
};
use assistant_presentation::{AppState, Cli, Framing, router};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    init_logging(cli.verbose, cli.log_json);

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    for issue in config.ensure_valid()? {
        warn!(field = %issue.field, "{}", issue.message);
    }

    let framing: Framing = config
        .server
        .framing
        .parse()
        .unwrap_or_else(|_| Framing::default());

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> =
        Arc::new(OpenAiGateway::from_config(&config.providers.openai));

    let personalize = PersonalizeClient::from_config(&config.platform.personalize)
        .context("failed to build Personalize client")?;
    let registry = Arc::new(builtin_registry(personalize));

    let conversation_logger: Arc<dyn ConversationLogger> = match &config.logging.transcript_path {
        Some(path) => match JsonlConversationLogger::open(path) {
            Some(logger) => {
                info!(path = %path.display(), "Writing turn transcripts");
                Arc::new(logger)
            }
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let use_case = RunTurnUseCase::new(gateway, registry)
        .with_policy(config.turn_policy())
        .with_model(config.model.parse_model())
        .with_temperature(config.model.temperature)
        .with_conversation_logger(conversation_logger);

    let shutdown = CancellationToken::new();
    let app = router(AppState::new(use_case, framing).with_shutdown(shutdown.clone()));

    // === Serve ===
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    info!(
        addr = %config.server.bind,
        framing = %framing,
        model = %config.model.name,
        "Starting asset-assistant"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
            // Running turns end with a cancelled error event
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

/// Initialize logging based on verbosity level. `RUST_LOG` wins when set.
fn init_logging(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(framing) = &cli.framing {
        config.server.framing = framing.clone();
    }
    if let Some(path) = &cli.transcript {
        config.logging.transcript_path = Some(path.clone());
    }
}
