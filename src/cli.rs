use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "jrun", about = "Run code on a Judge0-compatible judge", version)]
#[command(group(ArgGroup::new("program_input").args(["stdin", "stdin_file"]).multiple(false)))]
pub struct Cli {
    /// Source file to submit. Reads source from stdin when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Language tag (e.g. python3, cpp, rust). Inferred from the file
    /// extension when omitted; see --list-languages for all tags.
    #[arg(short, long)]
    pub language: Option<String>,

    /// Program input passed to the submission as stdin.
    #[arg(short = 'i', long = "stdin", value_name = "TEXT")]
    pub stdin: Option<String>,

    /// Read program input from a file.
    #[arg(long = "stdin-file", value_name = "FILE")]
    pub stdin_file: Option<PathBuf>,

    /// Print the raw normalized result as JSON instead of the colored summary.
    #[arg(long)]
    pub json: bool,

    /// List supported language tags.
    #[arg(short = 'L', long = "list-languages", visible_alias = "ll")]
    pub list_languages: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
