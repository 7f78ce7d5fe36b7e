//! Command line interface for the `seqframe` capture inspector.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Parser, Subcommand};

/// Command line arguments for the `seqframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "seqframe",
    version,
    about = "Inspect raw captures of sequenced packet streams"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every physical packet without validating sequence numbers.
    Packets {
        /// Capture file to read. Reads stdin when omitted.
        file: Option<PathBuf>,
    },
    /// Reassemble logical messages, validating sequence numbers.
    Messages {
        /// Capture file to read. Reads stdin when omitted.
        file: Option<PathBuf>,
        /// Reject messages larger than this many bytes.
        #[arg(long)]
        max_message_size: Option<NonZeroUsize>,
        /// Expect every message to restart numbering at zero.
        #[arg(long)]
        reset_sequence: bool,
    },
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, path::Path};

    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parses_messages_options() {
        let cli = Cli::parse_from([
            "seqframe",
            "messages",
            "capture.bin",
            "--max-message-size",
            "1024",
            "--reset-sequence",
        ]);
        let Command::Messages {
            file,
            max_message_size,
            reset_sequence,
        } = cli.command
        else {
            panic!("expected messages command");
        };
        assert_eq!(file.as_deref(), Some(Path::new("capture.bin")));
        assert_eq!(max_message_size.map(NonZeroUsize::get), Some(1024));
        assert!(reset_sequence);
    }

    #[test]
    fn packets_defaults_to_stdin() {
        let cli = Cli::parse_from(["seqframe", "packets"]);
        assert!(matches!(cli.command, Command::Packets { file: None }));
    }
}
