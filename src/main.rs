mod cli;
mod config;
mod handlers;
mod judge;
mod printer;

use anyhow::{bail, Context, Result};
use config::Config;
use is_terminal::IsTerminal;
use std::fs;
use std::io::{self, Read};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = cli::Cli::parse();

    if args.list_languages {
        for tag in judge::language::supported_languages() {
            println!("{tag}");
        }
        return Ok(());
    }

    let cfg = Config::load();
    log::debug!("config file: {}", cfg.config_path.display());

    // Source: file argument, or piped stdin.
    let source = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            if io::stdin().is_terminal() {
                bail!("no source file given and stdin is a terminal (pass FILE or pipe code in)");
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    // Language: flag beats file-extension inference beats configured default.
    let language = match args.language.clone() {
        Some(tag) => tag,
        None => args
            .file
            .as_deref()
            .and_then(judge::language::from_path)
            .or_else(|| cfg.get("DEFAULT_LANGUAGE"))
            .unwrap_or_else(|| "python3".to_string()),
    };

    let input = match (&args.stdin, &args.stdin_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        (None, None) => None,
    };

    handlers::run::run(&cfg, &source, &language, input.as_deref(), args.json).await
}
