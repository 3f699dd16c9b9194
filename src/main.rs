use anyhow::Result;
use clap::Parser;
use modsync::commands::{self, ListFilter, SearchOptions};
use modsync::config::{Config, ConfigOptions};
use std::path::PathBuf;

/// modsync - Factorio mod manager
///
/// Search the mod portal, download and update mods, and enable or disable
/// them in mod-list.json.
///
/// Downloads need a mod portal account. Set MODSYNC_USERNAME and MODSYNC_TOKEN
/// to skip the interactive login.
///
/// Examples:
///   modsync search --owner raiguard           # Mods by one author
///   modsync -f 1.1 download flib helmod       # Newest releases for Factorio 1.1
///   modsync -d ~/.factorio/mods update -y     # Update everything without asking
#[derive(Parser, Debug)]
#[command(author, version = env!("MODSYNC_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Mods directory holding mod-list.json (also via MODSYNC_DIR)
    #[arg(
        long = "dir",
        short = 'd',
        env = "MODSYNC_DIR",
        value_name = "PATH",
        default_value = ".",
        global = true
    )]
    pub dir: PathBuf,

    /// Game version releases must target; "*" or "any" accepts every version
    #[arg(
        long = "factorio",
        short = 'f',
        env = "MODSYNC_FACTORIO",
        value_name = "VERSION",
        global = true
    )]
    pub factorio: Option<String>,

    /// Mod portal URL (defaults to https://mods.factorio.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Login service URL (defaults to https://auth.factorio.com)
    #[arg(long = "auth-url", value_name = "URL", global = true)]
    pub auth_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search the mod portal
    Search(SearchArgs),

    /// Download mods and add them to the mod list
    Download(DownloadArgs),

    /// Update every mod in the mod list
    Update(UpdateArgs),

    /// Enable mods in the mod list
    Enable(StatusArgs),

    /// Disable mods in the mod list
    Disable(StatusArgs),

    /// Show the mod list
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Regular expression matched against mod names and titles
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Regular expression matched against the mod owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Regular expression matched against the mod category
    #[arg(long)]
    pub tag: Option<String>,

    /// Print matching names on a single line
    #[arg(long)]
    pub name_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Mod names as listed on the portal
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Mod names, as regular expressions unless --exact is given
    #[arg(value_name = "PATTERN", required = true)]
    pub patterns: Vec<String>,

    /// Match names exactly
    #[arg(long)]
    pub exact: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only print enabled mods
    #[arg(long, conflicts_with = "disabled")]
    pub enabled: bool,

    /// Only print disabled mods
    #[arg(long)]
    pub disabled: bool,
}

impl ListArgs {
    fn filter(&self) -> ListFilter {
        if self.enabled {
            ListFilter::Enabled
        } else if self.disabled {
            ListFilter::Disabled
        } else {
            ListFilter::All
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = modsync::runtime::RealRuntime;

    let config = Config::load(
        &runtime,
        ConfigOptions {
            mods_dir: cli.dir,
            factorio: cli.factorio,
            api_url: cli.api_url,
            auth_url: cli.auth_url,
        },
    )?;

    match cli.command {
        Commands::Search(args) => {
            commands::search(
                &config,
                SearchOptions {
                    pattern: args.pattern,
                    owner: args.owner,
                    tag: args.tag,
                    name_only: args.name_only,
                },
            )
            .await?
        }
        Commands::Download(args) => {
            commands::download(&runtime, &config, &args.names, args.yes).await?
        }
        Commands::Update(args) => commands::update(&runtime, &config, args.yes).await?,
        Commands::Enable(args) => {
            commands::set_status(&runtime, &config, true, &args.patterns, args.exact)?
        }
        Commands::Disable(args) => {
            commands::set_status(&runtime, &config, false, &args.patterns, args.exact)?
        }
        Commands::List(args) => commands::list(&runtime, &config, args.filter())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_download_parsing() {
        let cli = Cli::try_parse_from(["modsync", "download", "flib", "helmod", "-y"]).unwrap();
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.names, vec!["flib", "helmod"]);
                assert!(args.yes);
            }
            _ => panic!("Expected Download command"),
        }
    }

    #[test]
    fn test_cli_download_requires_name() {
        assert!(Cli::try_parse_from(["modsync", "download"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "modsync", "update", "--dir", "/tmp/mods", "-f", "1.1", "--api-url", "http://x",
        ])
        .unwrap();
        assert_eq!(cli.dir, PathBuf::from("/tmp/mods"));
        assert_eq!(cli.factorio.as_deref(), Some("1.1"));
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
        assert!(matches!(cli.command, Commands::Update(UpdateArgs { yes: false })));
    }

    #[test]
    fn test_cli_enable_exact() {
        let cli = Cli::try_parse_from(["modsync", "enable", "--exact", "flib"]).unwrap();
        match cli.command {
            Commands::Enable(args) => {
                assert!(args.exact);
                assert_eq!(args.patterns, vec!["flib"]);
            }
            _ => panic!("Expected Enable command"),
        }
    }

    #[test]
    fn test_cli_list_filters() {
        let cli = Cli::try_parse_from(["modsync", "list", "--disabled"]).unwrap();
        match cli.command {
            Commands::List(args) => assert_eq!(args.filter(), ListFilter::Disabled),
            _ => panic!("Expected List command"),
        }
        assert!(Cli::try_parse_from(["modsync", "list", "--enabled", "--disabled"]).is_err());
    }

    #[test]
    fn test_cli_search_parsing() {
        let cli =
            Cli::try_parse_from(["modsync", "search", "lib", "--owner", "rai", "--name-only"])
                .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.pattern.as_deref(), Some("lib"));
                assert_eq!(args.owner.as_deref(), Some("rai"));
                assert!(args.name_only);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["modsync"]).is_err());
    }
}
