mod commands;
mod context;
mod logging;
mod render;

use clap::{Args, Parser, Subcommand};
use promptloom_store::SortBy;

#[derive(Parser)]
#[command(name = "promptloom")]
#[command(about = "Compose, analyze and organize image-generation prompts")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, env = "PROMPTLOOM_CONFIG", default_value = "~/.promptloom/config.json")]
    config: String,

    /// Log at debug level regardless of the configured level
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a prompt from an idea and generation settings
    Compose(ComposeArgs),
    /// Break a raw prompt into subject, styles, moods, parameters and negatives
    Analyze {
        /// Prompt text
        text: String,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Saved prompt history
    #[command(subcommand)]
    Prompts(PromptCommands),
    /// Prompt groups
    #[command(subcommand)]
    Groups(GroupCommands),
    /// Generation-setting templates
    #[command(subcommand)]
    Templates(TemplateCommands),
    /// Search an external prompt gallery
    Search(SearchArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Generation settings shared by `compose` and `templates save`.
#[derive(Args, Clone, Default)]
pub struct SettingsArgs {
    /// Art style, e.g. "Oil Painting"
    #[arg(long)]
    pub style: Option<String>,
    /// Mood, e.g. "Dramatic"
    #[arg(long)]
    pub mood: Option<String>,
    /// Aspect ratio, e.g. 16:9
    #[arg(long = "ar")]
    pub aspect_ratio: Option<String>,
    /// Model version, e.g. 6.1 or "niji 6"
    #[arg(long = "model-version")]
    pub version: Option<String>,
    #[arg(long)]
    pub stylize: Option<u32>,
    #[arg(long)]
    pub chaos: Option<u32>,
    #[arg(long)]
    pub weird: Option<u32>,
    #[arg(long)]
    pub quality: Option<f64>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub stop: Option<u32>,
    #[arg(long)]
    pub tile: bool,
    /// Things to exclude, comma separated
    #[arg(long = "no")]
    pub negative: Option<String>,
    /// Style reference code
    #[arg(long)]
    pub sref: Option<String>,
    /// Style reference weight
    #[arg(long)]
    pub sw: Option<u32>,
}

#[derive(Args)]
pub struct ComposeArgs {
    /// The idea to render
    pub idea: String,
    #[command(flatten)]
    pub settings: SettingsArgs,
    /// Start from a saved template (id or name); explicit settings override it
    #[arg(long)]
    pub template: Option<String>,
    /// Save the result to history
    #[arg(long)]
    pub save: bool,
    #[arg(long, requires = "save")]
    pub title: Option<String>,
    #[arg(long, requires = "save")]
    pub group: Option<String>,
    #[arg(long = "tag", requires = "save")]
    pub tags: Vec<String>,
}

#[derive(Subcommand)]
pub enum PromptCommands {
    /// List saved prompts
    List {
        /// Substring matched against title, text and tags
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, conflicts_with = "ungrouped")]
        group: Option<String>,
        /// Only prompts without a group
        #[arg(long)]
        ungrouped: bool,
        #[arg(long)]
        favorites: bool,
        /// newest, oldest or alphabetical
        #[arg(long, default_value = "newest")]
        sort: SortBy,
    },
    /// Save a raw prompt
    Save {
        text: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        favorite: bool,
    },
    /// Show one prompt with its analysis
    Show { id: String },
    /// Change fields of a saved prompt
    Update {
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Replace all tags
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Toggle the favorite flag
    Favorite { id: String },
    /// Move a prompt into a group, or out of any group when none is given
    Move { id: String, group: Option<String> },
    Delete { id: String },
    /// Write prompts and groups as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<String>,
    },
    /// Replace prompts and groups from a JSON export
    Import { file: String },
    /// Collection statistics
    Stats,
}

#[derive(Subcommand)]
pub enum GroupCommands {
    List,
    Create {
        name: String,
        /// Colour token, e.g. #22c55e
        #[arg(long)]
        color: Option<String>,
    },
    Rename {
        id: String,
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a group; its prompts become ungrouped
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    List,
    /// Save generation settings under a name
    Save {
        name: String,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Compose a prompt for an idea with a template's settings
    Apply {
        /// Template id or name
        template: String,
        idea: String,
        #[arg(long)]
        save: bool,
    },
    Delete { id: String },
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search text; prints suggestions when omitted
    pub query: Option<String>,
    /// Search one of the suggested queries at random
    #[arg(long, conflicts_with = "query")]
    pub surprise: bool,
    #[arg(long, default_value = "10")]
    pub limit: usize,
    /// Save the result at this position (1-based) to history
    #[arg(long)]
    pub save: Vec<usize>,
    /// Aspect ratio appended to saved results
    #[arg(long = "ar")]
    pub aspect_ratio: Option<String>,
    /// Version appended to saved results
    #[arg(long = "model-version")]
    pub version: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a value, e.g. search.base_url
    Get { key: String },
    /// Set a value, e.g. logging.level debug
    Set { key: String, value: String },
    /// Write the default configuration
    Init {
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Print the whole configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = context::resolve_config_path(&cli.config);

    if let Commands::Config(command) = cli.command {
        return commands::config::run(command, &config_path).await;
    }

    let ctx = context::AppContext::load(&config_path).await?;
    logging::init(&ctx.config.logging, cli.debug)?;
    tracing::debug!("Using config {:?}", config_path);

    match cli.command {
        Commands::Compose(args) => commands::compose::compose(&ctx, args).await,
        Commands::Analyze { text, json } => commands::compose::analyze(&ctx, &text, json),
        Commands::Prompts(command) => commands::prompts::run(&ctx, command).await,
        Commands::Groups(command) => commands::groups::run(&ctx, command).await,
        Commands::Templates(command) => commands::templates::run(&ctx, command).await,
        Commands::Search(args) => commands::search::run(&ctx, args).await,
        Commands::Config(_) => Ok(()),
    }
}
