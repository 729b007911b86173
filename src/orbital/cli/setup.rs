use clap::{Args, Parser, Subcommand};
use orbital::commands::search::SearchFilter;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "orbital", bin_name = "orbital", version = get_version())]
#[command(about = "Organize saved links into collections and spaces", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Space to work in (id or name); defaults to the first space
    #[arg(short, long, global = true, help_heading = "Options")]
    pub space: Option<String>,

    /// JSON file with the open tabs (overrides the tabs-file setting)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub tabs: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the collections and links of a space
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Show every space, not just the current one
        #[arg(short, long)]
        all: bool,
    },

    /// Search collections, links and open tabs
    #[command(display_order = 2)]
    Search {
        /// Words to look for (joined with spaces)
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,

        /// ALL, TABS, COLLECTIONS or OPEN TABS
        #[arg(short, long, default_value = "ALL")]
        filter: SearchFilter,

        /// Act on the first hit: switch to its space and expand its collection
        #[arg(long)]
        select: bool,
    },

    /// Manage spaces
    #[command(subcommand, display_order = 10)]
    Space(SpaceCommands),

    /// Manage collections
    #[command(subcommand, alias = "col", display_order = 11)]
    Collection(CollectionCommands),

    /// Manage saved links
    #[command(subcommand, display_order = 12)]
    Link(LinkCommands),

    /// Work with open browser tabs
    #[command(subcommand, display_order = 13)]
    Tabs(TabCommands),

    /// Back up or restore everything
    #[command(subcommand, display_order = 20)]
    Backup(BackupCommands),

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (highlight-ms, tabs-file)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SpaceCommands {
    /// List spaces
    #[command(alias = "ls")]
    List,

    /// Create a space
    Add {
        /// Name words (joined with spaces); blank becomes "New Space"
        #[arg(trailing_var_arg = true)]
        name: Vec<String>,

        /// Icon name
        #[arg(short, long, default_value = "")]
        icon: String,
    },

    /// Rename a space or change its icon
    Edit {
        /// Space id or name
        space: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Delete a space with all its collections and links
    #[command(alias = "rm")]
    Delete {
        /// Space id or name
        space: String,
    },

    /// List the icon names a space can use
    Icons,
}

#[derive(Subcommand, Debug)]
pub enum CollectionCommands {
    /// Create a collection in the current space
    Add {
        /// Name words (joined with spaces); blank becomes a timestamp
        #[arg(trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Rename a collection
    Rename {
        /// Collection id or name
        collection: String,

        /// New name
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Delete a collection and its links
    #[command(alias = "rm")]
    Delete {
        /// Collection id or name
        collection: String,
    },

    /// Star or unstar a collection
    Star {
        /// Collection id or name
        collection: String,
    },

    /// Move a collection to the position of another one
    Move {
        /// Collection to move
        collection: String,

        /// Collection whose position it takes
        target: String,
    },

    /// Export a collection's links as CSV
    Export {
        /// Collection id or name
        collection: String,

        /// Output file (defaults to the collection name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct LinkFields {
    /// Title
    #[arg(short, long)]
    pub title: Option<String>,

    /// URL; https:// is assumed when no scheme is given
    #[arg(short, long)]
    pub url: Option<String>,

    /// Free-form comment; an empty comment clears it
    #[arg(short, long)]
    pub comment: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// Save a link into a collection
    Add {
        /// Collection id or name
        collection: String,

        /// URL; https:// is assumed when no scheme is given
        url: String,

        /// Title (defaults to the URL)
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Change a link's title, URL or comment
    Edit {
        /// Link id or title
        link: String,

        #[command(flatten)]
        fields: LinkFields,
    },

    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link id or title
        link: String,
    },

    /// Move a link to the position of another link, adopting its collection
    Move {
        /// Link to move
        link: String,

        /// Link whose position it takes
        target: String,
    },

    /// Hand a link over to another collection
    Reparent {
        /// Link id or title
        link: String,

        /// Collection id or name
        collection: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TabCommands {
    /// List open tabs grouped by window
    #[command(alias = "ls")]
    List,

    /// Save an open tab into a collection
    Save {
        /// Tab id
        tab: String,

        /// Collection id or name; defaults to the first collection of the space
        collection: Option<String>,
    },

    /// Save every tab of a window into a new collection
    SaveWindow {
        /// Window id
        window: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Write a backup of all spaces, collections and links
    Export {
        /// Output file (defaults to orbital_backup_<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace everything with the contents of a backup
    Import {
        /// Backup file
        file: PathBuf,
    },
}
