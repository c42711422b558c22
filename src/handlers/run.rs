//! Run handler: validate the request, drive the judge client, render the result.

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;

use crate::{
    config::Config,
    judge::{language, types::ExecutionRequest, JudgeClient},
    printer::ResultPrinter,
};

pub async fn run(
    cfg: &Config,
    source: &str,
    language_tag: &str,
    input: Option<&str>,
    json: bool,
) -> Result<()> {
    // Reject bad input before touching the network.
    if source.trim().is_empty() {
        bail!("code cannot be empty");
    }
    if language::language_id(language_tag).is_none() {
        bail!("invalid language: {language_tag} (see --list-languages)");
    }

    let client = JudgeClient::from_config(cfg)?;
    let request = ExecutionRequest {
        source_code: source.to_string(),
        language: language_tag.to_string(),
        stdin: input.map(str::to_string),
    };

    let result = client
        .execute(&request)
        .await
        .context("code execution failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        ResultPrinter::new(std::io::stdout().is_terminal()).print(&result);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn empty_cfg() -> Config {
        Config::load_from(PathBuf::from("/nonexistent/.jrunrc"))
    }

    #[tokio::test]
    async fn empty_code_is_rejected() {
        let err = run(&empty_cfg(), "   \n", "python3", None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn unknown_language_is_rejected() {
        let err = run(&empty_cfg(), "print(1)", "brainfart", None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid language"));
    }
}
