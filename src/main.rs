use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use seeclaw_tars::config::{self, AppConfig};
use seeclaw_tars::{ResponseParser, TarsAgent, TarsResult};

#[derive(Parser)]
#[command(name = "seeclaw-tars")]
#[command(about = "Turn UI-TARS completions into executable GUI actions", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults to next to the executable, then the working directory)
    #[arg(short, long, global = true, env = "SEECLAW_TARS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a raw model response and print the action records as JSON
    Parse {
        /// File holding the response (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Send a screenshot and instruction to the model and print the parsed actions
    Infer {
        /// PNG or JPEG screenshot, already sized for the model
        #[arg(short, long)]
        image: PathBuf,

        /// Natural-language task
        #[arg(short = 't', long)]
        instruction: String,
    },
}

#[tokio::main]
async fn main() {
    seeclaw_tars::init_tracing("info");

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> TarsResult<()> {
    let cfg = load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file } => {
            let text = read_response(file.as_deref())?;
            let json = ResponseParser::new(&cfg.parser).parse_to_json(&text)?;
            println!("{json}");
        }
        Commands::Infer { image, instruction } => {
            let screenshot = std::fs::read(&image)?;
            let agent = TarsAgent::from_config(&cfg);
            let json = agent.step_json(&screenshot, &instruction).await?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Raw response from a file or stdin, minus the newline the file ends with.
fn read_response(file: Option<&std::path::Path>) -> TarsResult<String> {
    let mut text = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    strip_trailing_newline(&mut text);
    Ok(text)
}

/// Drop exactly one trailing `\n` or `\r\n`.
fn strip_trailing_newline(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

/// An explicit path must load; otherwise missing config falls back to defaults.
fn load(path: Option<&std::path::Path>) -> TarsResult<AppConfig> {
    if let Some(p) = path {
        return config::load_config_from(p);
    }
    Ok(config::load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config; using defaults");
        AppConfig::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_trailing_newline_is_stripped() {
        let mut lf = "Action: wait()\n".to_string();
        strip_trailing_newline(&mut lf);
        assert_eq!(lf, "Action: wait()");

        let mut crlf = "Action: wait()\r\n".to_string();
        strip_trailing_newline(&mut crlf);
        assert_eq!(crlf, "Action: wait()");

        let mut blank = "Action: wait()\n\n".to_string();
        strip_trailing_newline(&mut blank);
        assert_eq!(blank, "Action: wait()\n");
    }

    #[test]
    fn newline_terminated_file_parses_its_last_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.txt");
        std::fs::write(&path, "Thought: open it\nAction: click(start_box='[100,200]')\n").unwrap();

        let text = read_response(Some(path.as_path())).unwrap();
        let json = ResponseParser::default().parse_to_json(&text).unwrap();
        assert_eq!(
            json,
            r#"[{"reflection":null,"thought":"open it","action_type":"click","action_inputs":{"start_box":"[0.1,0.2,0.1,0.2]"}}]"#
        );
    }
}
