//! The `profiles` command: list configuration profiles.

use crate::cli::ProfilesArgs;
use crate::config::{AgentConfigBuilder, ConfigName, ConfigOverrides, ProfileSet};
use crate::error::Result;
use crate::paths;

pub fn cmd_profiles(args: ProfilesArgs) -> Result<()> {
    let overlays = match args.profiles {
        Some(path) => ProfileSet::load(path)?.unwrap_or_default(),
        None => match paths::root_path() {
            Ok(root) => ProfileSet::load(paths::agents_config_path(&root))?.unwrap_or_default(),
            // Outside a project there is no overlay file; built-ins only.
            Err(_) => ProfileSet::default(),
        },
    };
    let builder = AgentConfigBuilder::with_profiles(overlays);

    for name in ConfigName::all() {
        let config = builder.create(name, &ConfigOverrides::default())?;
        println!("{}:", name);
        println!("  command: {}", config.command);
        println!("  model: {}", config.model);
        println!("  timeout_seconds: {}", config.timeout_seconds);
    }

    Ok(())
}
