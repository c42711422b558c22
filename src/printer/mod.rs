//! Terminal rendering for execution results.

use owo_colors::OwoColorize;

use crate::judge::types::{ExecutionResult, STATUS_POLL_TIMEOUT};

pub struct ResultPrinter {
    pub color: bool,
}

impl ResultPrinter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn print(&self, res: &ExecutionResult) {
        let header = format!("{} (status {})", res.status, res.status_id);
        if !self.color {
            println!("{header}");
        } else if res.accepted() {
            println!("{}", header.green());
        } else if matches!(res.status_id, 5 | STATUS_POLL_TIMEOUT) {
            println!("{}", header.yellow());
        } else {
            println!("{}", header.red());
        }

        if let Some(compile_output) = &res.compile_output {
            if !compile_output.is_empty() {
                self.section("compiler output");
                print_block(compile_output);
            }
        }
        if let Some(stdout) = &res.stdout {
            if !stdout.is_empty() {
                self.section("stdout");
                print_block(stdout);
            }
        }
        if let Some(stderr) = &res.stderr {
            if !stderr.is_empty() {
                self.section("stderr");
                print_block(stderr);
            }
        }

        let mut footer = Vec::new();
        if let Some(time) = res.time {
            footer.push(format!("time {time}s"));
        }
        if let Some(memory) = res.memory {
            footer.push(format!("memory {memory} KB"));
        }
        if let Some(code) = res.exit_code {
            footer.push(format!("exit {code}"));
        }
        if !footer.is_empty() {
            let line = footer.join("  ");
            if self.color {
                println!("{}", line.dimmed());
            } else {
                println!("{line}");
            }
        }
    }

    fn section(&self, title: &str) {
        if self.color {
            println!("{}", format!("--- {title} ---").cyan());
        } else {
            println!("--- {title} ---");
        }
    }
}

fn print_block(text: &str) {
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
}
