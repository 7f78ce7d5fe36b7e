//! `seqframe` binary: inspects raw captures of sequenced packet streams.
//!
//! Parses CLI arguments, opens the capture, and prints either the physical
//! packets or the reassembled logical messages.

mod cli;
mod inspect;

use std::error::Error;

use clap::Parser;
use seqframe::PacketConfig;
use tokio::io::{AsyncRead, BufReader};

use crate::cli::{Cli, Command};

async fn open(
    file: Option<&std::path::Path>,
) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
    match file {
        Some(path) => Ok(Box::new(tokio::fs::File::open(path).await?)),
        None => Ok(Box::new(tokio::io::stdin())),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut stdout = tokio::io::stdout();
    match cli.command {
        Command::Packets { file } => {
            let input = open(file.as_deref()).await?;
            inspect::list_packets(input, &mut stdout).await?;
        }
        Command::Messages {
            file,
            max_message_size,
            reset_sequence,
        } => {
            let capacity = PacketConfig::default().read_buffer_capacity();
            let mut input = BufReader::with_capacity(capacity, open(file.as_deref()).await?);
            inspect::list_messages(&mut input, &mut stdout, max_message_size, reset_sequence)
                .await?;
        }
    }
    Ok(())
}
