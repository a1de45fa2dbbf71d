//! CLI argument definitions using clap
//!
//! Commands:
//! - mediafields fields
//! - mediafields inspect --kind <video|audio> --probe <dump> [--path <file>] [--config <path>]
//! - mediafields check --field <name> --value <json>
//! - mediafields intervals --probe <dump> --intervals <raw> [--path <file>] [--config <path>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::media::MediaKind;

/// mediafields - validated media metadata
#[derive(Parser, Debug)]
#[command(name = "mediafields")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the media field kinds, their validators and aliases
    Fields,

    /// Populate a media record from a probe dump and print its fields
    Inspect {
        /// Record kind to populate
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Probe dump (JSON, {"tracks": [...]})
        #[arg(long)]
        probe: PathBuf,

        /// Media file the dump describes (defaults to the dump path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run one raw value through a field's validator
    Check {
        /// Canonical field name or alias
        #[arg(long)]
        field: String,

        /// Raw value as JSON; anything that is not JSON is taken as a string
        #[arg(long)]
        value: String,
    },

    /// Filter pre-computed non-silent intervals of an audio file
    Intervals {
        /// Probe dump (JSON, {"tracks": [...]})
        #[arg(long)]
        probe: PathBuf,

        /// Raw intervals (JSON, [[start_ms, end_ms], ...])
        #[arg(long)]
        intervals: PathBuf,

        /// Audio file the dump describes (defaults to the dump path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Media kind accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Video,
    Audio,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Video => MediaKind::Video,
            KindArg::Audio => MediaKind::Audio,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::try_parse_from([
            "mediafields",
            "inspect",
            "--kind",
            "audio",
            "--probe",
            "clip.json",
        ])
        .unwrap();
        match cli.command {
            Command::Inspect { kind, probe, path, config } => {
                assert_eq!(MediaKind::from(kind), MediaKind::Audio);
                assert_eq!(probe, PathBuf::from("clip.json"));
                assert!(path.is_none());
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let result = Cli::try_parse_from([
            "mediafields",
            "inspect",
            "--kind",
            "image",
            "--probe",
            "clip.json",
        ]);
        assert!(result.is_err());
    }
}
