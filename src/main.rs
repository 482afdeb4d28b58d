use anyhow::Result;
use clap::Parser;
use shopchat::cli::{Cli, Commands};
use shopchat::{build_pipeline, utils, AppState, Settings};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            handle_serve(settings).await
        }
        Commands::Chat { conversation_id } => handle_chat(settings, conversation_id).await,
    }
}

async fn handle_serve(settings: Settings) -> Result<()> {
    let pipeline = build_pipeline(&settings).await?;
    let store = Arc::clone(pipeline.store());
    let state = Arc::new(AppState { pipeline, store });

    shopchat::server::serve(state, &settings.server).await
}

async fn handle_chat(settings: Settings, conversation_id: Option<String>) -> Result<()> {
    let pipeline = build_pipeline(&settings).await?;

    utils::print_header("Shopchat Assistant");
    utils::print_info("Type your messages (Ctrl+C to exit)\n");

    let mut conversation_id = conversation_id;
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::print_prompt("You: ");
        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match pipeline.process(input, conversation_id.as_deref()).await {
            Ok(reply) => {
                conversation_id = Some(reply.conversation_id.clone());
                utils::print_info("Assistant:");
                println!("{}\n", reply.response);
            }
            Err(e) => {
                utils::print_error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
