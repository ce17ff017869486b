use anyhow::Result;
use clap::Parser;

use lingo_cli::cli::commands::{batch, cache, configure, languages, translate, usage};
use lingo_cli::cli::{Args, Command};
use lingo_cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || std::env::var("NO_COLOR").is_ok(),
    });

    match args.command {
        Some(Command::Batch {
            paths,
            dir,
            to,
            from,
            formality,
            recursive,
            pattern,
            output_dir,
            output_template,
            concurrency,
            no_cache,
        }) => {
            let options = batch::BatchCliOptions {
                paths,
                dir,
                to,
                from,
                formality,
                recursive,
                pattern,
                output_dir,
                output_template,
                concurrency,
                no_cache,
            };
            batch::run_batch(options).await?;
        }
        Some(Command::Languages { local }) => {
            languages::run_languages(local).await?;
        }
        Some(Command::Usage) => {
            usage::run_usage().await?;
        }
        Some(Command::Cache { action }) => {
            cache::run_cache(action)?;
        }
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        None => {
            let options = translate::TranslateOptions {
                file: args.file,
                to: args.to,
                from: args.from,
                formality: args.formality,
                no_cache: args.no_cache,
            };
            translate::run_translate(options).await?;
        }
    }

    Ok(())
}
