//! The Restora client.
//!
//! Sends a single workspace id to the running service over the local
//! request channel. Exits 0 when the request was accepted, 1 on a
//! missing argument or a send failure.

use clap::Parser;
use restora_core::config::ConfigLoader;
use restora_system::channel::{send_request, socket_path};
use std::process::ExitCode;

/// Restore a saved workspace onto the current desktop.
#[derive(Parser, Debug)]
#[command(name = "restora")]
struct Cli {
    /// Identifier of the workspace to restore.
    workspace_id: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let socket_name = ConfigLoader::load_or_default()
        .map(|config| config.channel.socket_name)
        .unwrap_or_else(|_| restora_core::config::defaults::default_socket_name());
    let path = socket_path(&socket_name);

    match send_request(&path, &cli.workspace_id).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("failed to send workspace request: {}", e);
            ExitCode::from(1)
        }
    }
}
