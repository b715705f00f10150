//! `modinfo check` command
//!
//! Validates ModInfo.toml and every module spec in it. No process is spawned.

use anyhow::{Context, Result};

use crate::cli::CheckArgs;
use crate::commands::load_manifest;
use modinfo::core::manifest::module_table;
use modinfo::core::ClasspathRole;
use modinfo::util::GlobalContext;

pub fn execute(args: CheckArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest = load_manifest(&ctx, args.manifest.as_deref())?;

    for set in manifest.source_sets() {
        set.spec
            .validate()
            .with_context(|| format!("in source set `{}`", set.name))?;

        for role in ClasspathRole::ALL {
            for entry in set.classpaths.get(role) {
                if !entry.exists() {
                    tracing::warn!(
                        "{} classpath entry of `{}` does not exist: {}",
                        role,
                        set.name,
                        entry.display()
                    );
                }
            }
        }

        if args.print {
            println!("# source set `{}`\n{}", set.name, module_table(&set.spec)?);
        }

        eprintln!(
            "     Checked `{}` ({}): {} requires, {} exports, {} opens, {} provides",
            set.spec.name(),
            set.name,
            set.spec.requires().len(),
            set.spec.exports().len(),
            set.spec.opens().len(),
            set.spec.provides().len()
        );
    }

    Ok(())
}
