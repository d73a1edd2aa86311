use clap::{Parser, Subcommand};

/// ChatKit Portal — homepage and session proxy for the ChatKit widget
#[derive(Parser)]
#[command(name = "chatkit-portal", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to bind (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create one ChatKit session with the current environment and print the result
    Session,
}
