use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shopchat")]
#[command(author, version, about = "Retrieval-augmented chat backend for e-commerce product support", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the assistant from the terminal
    Chat {
        /// Resume an existing conversation
        #[arg(long)]
        conversation_id: Option<String>,
    },
}
