//! `modinfo generate` command

use anyhow::{bail, Context, Result};

use crate::cli::GenerateArgs;
use crate::commands::{listing_timeout, load_manifest};
use modinfo::classify::ConflictPolicy;
use modinfo::lister::JavaModuleLister;
use modinfo::ops::generate::{generate, GenerateOptions};
use modinfo::util::GlobalContext;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest = load_manifest(&ctx, args.manifest.as_deref())?;
    let config = ctx.load_config(manifest.root());

    let source_sets = manifest.select(&args.source_set)?;
    if args.output.is_some() && source_sets.len() != 1 {
        bail!(
            "--output needs exactly one source set, {} selected\n\
             use --source-set to pick one",
            source_sets.len()
        );
    }

    // Source sets with empty classpaths never spawn java.
    let needs_java = source_sets.iter().any(|set| !set.classpaths.is_empty());
    let java = if needs_java {
        config.resolve_java(args.java.as_deref())?
    } else {
        args.java.clone().unwrap_or_else(|| "java".into())
    };
    let lister =
        JavaModuleLister::new(java).with_timeout(listing_timeout(args.timeout, &config));

    let options = GenerateOptions {
        conflict_policy: if args.strict {
            ConflictPolicy::Error
        } else {
            ConflictPolicy::Override
        },
        dry_run: args.dry_run,
    };

    for set in source_sets {
        let output_dir = match args.output {
            Some(ref dir) => ctx.resolve(dir),
            None => set.output_dir.clone(),
        };

        let result = generate(
            set.spec.clone(),
            set.classpaths.clone(),
            output_dir,
            &lister,
            options.clone(),
        )
        .with_context(|| format!("failed to generate source set `{}`", set.name))?;

        if args.dry_run {
            print!("{}", result.contents);
        } else if result.fresh {
            eprintln!(
                "   Generated `{}` ({}) -> {}",
                set.spec.name(),
                set.name,
                result.path.display()
            );
        } else {
            eprintln!(
                "       Fresh `{}` ({}) -> {}",
                set.spec.name(),
                set.name,
                result.path.display()
            );
        }
    }

    Ok(())
}
