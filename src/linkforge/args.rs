use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "linkforge", version)]
#[command(
    about = "Create NTFS directory junctions and keep a checked history of them",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// The three fields of a creation request, optionally seeded from history.
#[derive(Args, Debug, Clone, Default)]
pub struct LinkFields {
    /// The EXISTING directory that the link will point TO
    #[arg(short, long)]
    pub source: Option<String>,

    /// The directory WHERE the new link folder will be CREATED
    #[arg(short, long)]
    pub parent: Option<String>,

    /// The NAME of the new link folder
    #[arg(short, long)]
    pub name: Option<String>,

    /// Start from history entry N (explicit fields still override)
    #[arg(long, value_name = "N")]
    pub from: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a junction and record it in the history
    #[command(alias = "new")]
    Create {
        #[command(flatten)]
        fields: LinkFields,

        /// Validate only, do not create anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the equivalent mklink command
    Preview {
        #[command(flatten)]
        fields: LinkFields,

        /// Copy the command to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// List created junctions with their current status (newest first)
    #[command(alias = "ls")]
    History {
        /// Only show entries that are not valid
        #[arg(long)]
        invalid: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check an arbitrary link against its expected source
    Check {
        /// Path of the link
        link: String,

        /// Directory the link should point to
        source: String,
    },

    /// Print the link (or source) path of a history entry
    Path {
        /// History entry number, as shown by `history`
        index: usize,

        /// Print the source instead of the link
        #[arg(long)]
        source: bool,
    },

    /// Open the link (or source) of a history entry in the file manager
    Open {
        /// History entry number, as shown by `history`
        index: usize,

        /// Open the source instead of the link
        #[arg(long)]
        source: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (history-file, require-admin)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
