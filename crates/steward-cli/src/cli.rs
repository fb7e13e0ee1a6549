use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "steward")]
#[command(about = "Steward CLI: create, converge and inspect managed resources")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file (defaults to ./steward.toml)
    #[arg(short, long, global = true, env = "STEWARD_CONFIG")]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Policy,
    ResourceSet,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a resource and converge its membership and tags
    Create(CreateArgs),
    /// Read a resource by id
    Read(TargetArgs),
    /// Update a resource to the desired model
    Update(UpdateArgs),
    /// Delete a resource by id
    Delete(TargetArgs),
    /// List every resource of a kind
    List(ListArgs),
    /// Show the effective configuration
    Config,
}

impl Commands {
    /// The resource kind the command addresses, if any.
    pub fn kind(&self) -> Option<KindArg> {
        match self {
            Commands::Create(args) => Some(args.kind),
            Commands::Update(args) => Some(args.kind),
            Commands::Read(args) | Commands::Delete(args) => Some(args.kind),
            Commands::List(args) => Some(args.kind),
            Commands::Config => None,
        }
    }

    /// Whether the command may change gateway state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Commands::Create(_) | Commands::Update(_) | Commands::Delete(_)
        )
    }
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Resource kind
    pub kind: KindArg,
    /// Path to the desired model as JSON (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct UpdateArgs {
    /// Resource kind
    pub kind: KindArg,
    /// Path to the desired model as JSON, including its id (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
    /// Path to the previously observed model as JSON
    #[arg(long)]
    pub previous: Option<String>,
}

#[derive(clap::Args)]
pub struct TargetArgs {
    /// Resource kind
    pub kind: KindArg,
    /// Resource id
    pub id: String,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Resource kind
    pub kind: KindArg,
}
