//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::envelope::{Cursor, PageBudget};
use crate::storage::config::ConfigOverrides;

/// Command-line client for the Wykop v3 API.
#[derive(Parser, Debug)]
#[command(name = "wykop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // === Global flags ===
    /// Config file (default: platform config dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Application key
    #[arg(long, value_name = "KEY", global = true)]
    pub key: Option<String>,

    /// Application secret
    #[arg(long, value_name = "SECRET", global = true)]
    pub secret: Option<String>,

    /// User refresh token (logged-in access)
    #[arg(long, value_name = "TOKEN", global = true)]
    pub refresh_token: Option<String>,

    /// File the refresh token is read from and written back to
    #[arg(long, value_name = "PATH", global = true)]
    pub token_file: Option<PathBuf>,

    /// API root URL
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Settings given on the command line, for config resolution.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            key: self.key.clone(),
            secret: self.secret.clone(),
            refresh_token: self.refresh_token.clone(),
            token_file: self.token_file.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the login URL that yields a refresh token
    Connect,

    /// List microblog entries
    Entries(EntriesArgs),

    /// Show one entry
    Entry {
        id: i64,
    },

    /// List comments under an entry
    EntryComments {
        id: i64,
        #[command(flatten)]
        pages: PageArgs,
    },

    /// List users who voted for an entry
    EntryVotes {
        id: i64,
        /// Page of voters to show
        #[arg(long, value_name = "PAGE")]
        page: Option<String>,
    },

    /// Publish an entry
    PostEntry(PostEntryArgs),

    /// Delete an entry
    DeleteEntry {
        id: i64,
    },

    /// List users who voted for a comment
    CommentVotes {
        entry_id: i64,
        comment_id: i64,
        /// Page of voters to show
        #[arg(long, value_name = "PAGE")]
        page: Option<String>,
    },

    /// Entries and links under a tag
    TagStream {
        tag: String,
        #[command(flatten)]
        pages: PageArgs,
    },

    /// Popular tags
    TagsPopular,

    /// Upload a photo and print its descriptor
    UploadPhoto {
        path: PathBuf,
        /// Media area: settings, comments, links or content
        #[arg(long, default_value = "content")]
        media_type: String,
    },
}

/// Pagination flags shared by listing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page number or page hash to start from
    #[arg(long, value_name = "PAGE")]
    pub page: Option<String>,

    /// Number of pages to fetch; -1 fetches all
    #[arg(long, value_name = "N", default_value_t = 1, allow_negative_numbers = true)]
    pub pages: i64,
}

impl PageArgs {
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.page.as_deref().map_or(Cursor::None, Cursor::parse)
    }

    #[must_use]
    pub fn budget(&self) -> PageBudget {
        PageBudget::from_count(self.pages)
    }
}

/// Arguments for the `entries` command.
#[derive(Args, Debug)]
pub struct EntriesArgs {
    /// newest, active or hot
    #[arg(long, default_value = "hot")]
    pub sort: String,

    /// Hours to look back with `hot` (1, 2, 3, 6, 12, 24)
    #[arg(long, default_value_t = 12)]
    pub last_update: u8,

    #[arg(long)]
    pub category: Option<String>,

    /// Hash of a user category
    #[arg(long)]
    pub bucket: Option<String>,

    /// Items per page
    #[arg(long)]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub pages: PageArgs,
}

/// Arguments for the `post-entry` command.
#[derive(Args, Debug)]
pub struct PostEntryArgs {
    pub content: String,

    /// Mark as adult content
    #[arg(long)]
    pub adult: bool,

    /// Key of a previously uploaded photo
    #[arg(long, value_name = "KEY")]
    pub photo: Option<String>,
}
