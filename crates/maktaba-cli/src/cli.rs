//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use maktaba_search::QueryParams;

/// Maktaba - search the content library
#[derive(Parser, Debug)]
#[command(name = "maktaba")]
#[command(about = "Query the Maktaba search index", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MAKTABA_CONFIG", global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse or search the index
    Search(SearchArgs),

    /// Configuration file operations
    Config {
        /// What to do with the config file
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `maktaba search`.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Query text; omit or pass `*` to browse
    pub query: Option<String>,

    /// Tenant (domain) id
    #[arg(short, long)]
    pub domain: u64,

    /// Content types to search (repeatable)
    #[arg(short = 't', long = "type")]
    pub types: Vec<String>,

    /// Filter by scholar slug (repeatable)
    #[arg(long = "scholar")]
    pub scholars: Vec<String>,

    /// Filter by media type (repeatable)
    #[arg(long = "media-type")]
    pub media_types: Vec<String>,

    /// Filter by topic slug (repeatable)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Minimum duration in seconds
    #[arg(long)]
    pub duration_min: Option<u32>,

    /// Maximum duration in seconds
    #[arg(long)]
    pub duration_max: Option<u32>,

    /// Page number (1-based)
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Merge all content types into one relevance-ordered list
    #[arg(long)]
    pub expand: bool,

    /// Sort override, e.g. `published_at:desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Typesense URL (overrides the config file)
    #[arg(long, env = "TYPESENSE_URL")]
    pub url: Option<String>,

    /// Typesense API key (overrides the config file)
    #[arg(long, env = "TYPESENSE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Answer from a saved provider response (JSON) instead of the index
    #[arg(long)]
    pub fixture: Option<String>,

    /// Print the provider request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    /// Inbound parameters for the search service.
    pub fn to_params(&self) -> QueryParams {
        QueryParams {
            q: self.query.clone(),
            page: self.page,
            per_page: self.per_page,
            content_types: self.types.clone(),
            scholars: self.scholars.clone(),
            media_types: self.media_types.clone(),
            topics: self.topics.clone(),
            duration_min: self.duration_min,
            duration_max: self.duration_max,
            expand_search: self.expand,
            sort: self.sort.clone(),
        }
    }
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Get a value by dotted key (e.g. `search.per_page_single`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value (bool, integer, float or string)
        value: String,
    },

    /// Create a default config file
    Init {
        /// Where to write the file (defaults to the platform config dir)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
