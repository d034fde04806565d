use std::io::Read;
use std::path::Path;

use anyhow::Context;
use ferry_config::FerryConfig;
use ferry_sanitize::{SanitizeOptions, UrlPolicy, sanitize};

use crate::bootstrap;
use crate::cli::root_commands::SanitizeArgs;

/// Handle `ferry sanitize`: clean one document and print it to stdout.
pub fn handle(args: &SanitizeArgs, config: &FerryConfig) -> anyhow::Result<()> {
    let input = read_input(args.input.as_deref())?;
    let urls = if args.rewrite_urls {
        bootstrap::url_policy(config)
    } else {
        UrlPolicy::passthrough()
    };
    let options = SanitizeOptions {
        target: args.target.into(),
        urls,
    };

    let cleaned = sanitize(&input, &options);
    print!("{cleaned}");
    if !cleaned.is_empty() && !cleaned.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}
