use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "modscope",
    about = "Check mod definitions and inspect mod-scoped data",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Host configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve definition assets and report errors
    Check(CheckArgs),
    /// Read or write mod-scoped data
    Data(DataArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(required = true)]
    pub assets: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DataArgs {
    #[command(subcommand)]
    pub action: DataAction,
}

#[derive(Subcommand)]
pub enum DataAction {
    /// Store data for a mod on an owner
    Set(SetArgs),
    /// Print the data a mod stored on an owner
    Get(GetArgs),
    /// List mods with data on an owner
    List(ListArgs),
}

#[derive(Args)]
pub struct StoreArgs {
    /// Data directory; overrides a file backend from --config
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Owner handle
    #[arg(long)]
    pub owner: u64,
}

#[derive(Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Definition asset of the owning mod
    #[arg(long)]
    pub asset: PathBuf,
    #[command(flatten)]
    pub payload: Payload,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Payload {
    /// JSON document to store
    #[arg(long)]
    pub json: Option<String>,
    /// Raw bytes to store, hex encoded
    #[arg(long)]
    pub hex: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    #[arg(long)]
    pub asset: PathBuf,
    /// Print the stored bytes as hex instead of decoding JSON
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn set_requires_exactly_one_payload() {
        let base = ["modscope", "data", "set", "--owner", "1", "--asset", "a.toml"];
        assert!(Cli::try_parse_from(base).is_err());

        let both = base.iter().copied().chain(["--json", "1", "--hex", "01"]);
        assert!(Cli::try_parse_from(both).is_err());

        let json = base.iter().copied().chain(["--json", "{}"]);
        let cli = Cli::try_parse_from(json).unwrap();
        match cli.command {
            Command::Data(DataArgs {
                action: DataAction::Set(args),
            }) => {
                assert_eq!(args.payload.json.as_deref(), Some("{}"));
                assert_eq!(args.store.owner, 1);
                assert!(args.store.data_dir.is_none());
            }
            _ => panic!("expected data set"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["modscope", "check", "a.toml", "--verbose", "--config", "c.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }
}
