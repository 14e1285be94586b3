use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Print city suggestions for a name prefix
    Suggest { prefix: String },

    /// Look up ski slopes near a city
    Search {
        city: String,

        /// Search radius in kilometers; non-numeric or non-positive values fall back to 100
        #[arg(short, long, default_value = "100", allow_hyphen_values = true)]
        range: String,
    },

    /// Start the interactive terminal UI
    Tui {
        /// Append logs to this file; logging is off in the TUI otherwise
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}
