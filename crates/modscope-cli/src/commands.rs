use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use modscope_sdk::{
    DefinitionAsset, HostConfig, ModBinding, ModComponent, ModHost, ModRegistry, OwnerId,
    StoreBackend,
};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    match cli.command {
        Command::Check(args) => cmd_check(&config, args),
        Command::Data(args) => match args.action {
            DataAction::Set(args) => cmd_data_set(&config, args),
            DataAction::Get(args) => cmd_data_get(&config, args),
            DataAction::List(args) => cmd_data_list(&config, args),
        },
    }
}

/// The host object a data command acts on.
struct Target {
    owner: OwnerId,
    binding: ModBinding,
}

impl ModComponent for Target {
    fn owner(&self) -> OwnerId {
        self.owner
    }

    fn binding(&self) -> &ModBinding {
        &self.binding
    }
}

fn open_host(config: &HostConfig, args: &StoreArgs) -> anyhow::Result<ModHost> {
    let store = match (&args.data_dir, &config.store) {
        (Some(dir), _) => StoreBackend::File { root: dir.clone() },
        (None, backend @ StoreBackend::File { .. }) => backend.clone(),
        (None, StoreBackend::Memory { .. }) => {
            bail!("no data directory: pass --data-dir or configure a file store backend")
        }
    };
    debug!(?store, "opening data store");
    let config = HostConfig {
        registry: config.registry.clone(),
        store,
    };
    Ok(ModHost::from_config(&config)?)
}

fn bind_target(host: &ModHost, owner: u64, asset: &Path) -> anyhow::Result<Target> {
    let asset = DefinitionAsset::load(asset)?;
    let definition = host.resolve(&asset)?;
    let target = Target {
        owner: OwnerId::new(owner),
        binding: ModBinding::new(),
    };
    host.register_component(&target, &definition)?;
    Ok(target)
}

fn cmd_check(config: &HostConfig, args: CheckArgs) -> anyhow::Result<()> {
    let registry = ModRegistry::with_config(config.registry.clone());
    let mut failed = 0;
    for path in &args.assets {
        match DefinitionAsset::load(path).and_then(|asset| registry.resolve(&asset)) {
            Ok(definition) => println!("{} {}", "✓".green().bold(), definition),
            Err(e) => {
                failed += 1;
                println!("{} {}", "✗".red().bold(), e);
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} definition assets failed", args.assets.len());
    }
    println!("{} mod(s) registered", registry.len().to_string().bold());
    Ok(())
}

fn cmd_data_set(config: &HostConfig, args: SetArgs) -> anyhow::Result<()> {
    let host = open_host(config, &args.store)?;
    let target = bind_target(&host, args.store.owner, &args.asset)?;
    let definition = host.owner_identity(&target)?;

    match (&args.payload.json, &args.payload.hex) {
        (Some(text), _) => {
            let value: serde_json::Value =
                serde_json::from_str(text).context("--json is not valid JSON")?;
            host.set_json(&target, &value)?;
        }
        (None, Some(text)) => {
            let bytes = hex::decode(text.trim()).context("--hex is not valid hex")?;
            host.set_raw(&target, &bytes)?;
        }
        (None, None) => bail!("nothing to store: pass --json or --hex"),
    }
    println!(
        "{} Stored data for {} on {}",
        "✓".green().bold(),
        definition.id().as_str().yellow(),
        target.owner
    );
    Ok(())
}

fn cmd_data_get(config: &HostConfig, args: GetArgs) -> anyhow::Result<()> {
    let host = open_host(config, &args.store)?;
    let target = bind_target(&host, args.store.owner, &args.asset)?;

    if args.raw {
        match host.get_raw(&target)? {
            Some(bytes) => println!("{}", hex::encode(bytes)),
            None => println!("{}", "no data".dimmed()),
        }
    } else {
        match host.get_json::<_, serde_json::Value>(&target)? {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => println!("{}", "no data".dimmed()),
        }
    }
    Ok(())
}

fn cmd_data_list(config: &HostConfig, args: ListArgs) -> anyhow::Result<()> {
    let host = open_host(config, &args.store)?;
    let owner = OwnerId::new(args.store.owner);
    let mods = host.data().mods_for_owner(owner)?;
    if mods.is_empty() {
        println!("{}", "no data".dimmed());
        return Ok(());
    }
    println!("Mods with data on {}:", owner.to_string().bold());
    for id in mods {
        println!("  {}", id.as_str().yellow());
    }
    Ok(())
}
