//! `modinfo list` command
//!
//! Runs the module listing directly, mainly to debug a classpath.

use anyhow::Result;

use crate::cli::ListArgs;
use crate::commands::listing_timeout;
use modinfo::lister::{JavaModuleLister, ModuleLister};
use modinfo::util::GlobalContext;

pub fn execute(args: ListArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config(ctx.cwd());

    let java = config.resolve_java(args.java.as_deref())?;
    let lister =
        JavaModuleLister::new(java).with_timeout(listing_timeout(args.timeout, &config));

    let paths: Vec<_> = args.paths.iter().map(|p| ctx.resolve(p)).collect();
    let modules = if args.all {
        lister.list_all(&paths)?
    } else {
        lister.list(&paths)?
    };

    for module in &modules {
        let mut line = module.name.clone();
        if let Some(ref version) = module.version {
            line.push('@');
            line.push_str(version);
        }
        if let Some(ref location) = module.location {
            line.push(' ');
            line.push_str(location.as_str());
        }
        println!("{}", line);
    }

    tracing::debug!("{} module(s) listed", modules.len());
    Ok(())
}
