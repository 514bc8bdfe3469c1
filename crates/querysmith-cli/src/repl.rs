//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Any line that is not a command is asked as a request.

use crate::cli::{
    AskArgs, Command, ConfigAction, ConfigArgs, CorpusAction, CorpusArgs, DebugArgs, SchemaAction,
    SchemaArgs, Toggle,
};
use crate::commands;
use crate::config::data_dir;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use querysmith_domain::{CompletionService, SettingsStore};
use querysmith_pipeline::Pipeline;
use querysmith_store::StoreError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl<C, S>(
    api_key: Option<&str>,
    store: &S,
    pipeline: &Pipeline<C>,
    formatter: &Formatter,
    history_size: usize,
) -> Result<()>
where
    C: CompletionService + 'static,
    S: SettingsStore<Error = StoreError>,
{
    println!(
        "{}",
        formatter.info("Querysmith REPL - Type a request, 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("querysmith> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Command(cmd)) => {
                        if let Err(e) =
                            commands::execute(cmd, api_key, store, pipeline, formatter).await
                        {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    Command(Command),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(first) = parts.first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    let command = match *first {
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit),
        "help" | "?" => return Ok(ReplCommand::Help),
        "ask" => parse_ask_command(&parts[1..])?,
        "config" => parse_config_command(&parts[1..])?,
        "schema" => parse_schema_command(&parts[1..])?,
        "corpus" => parse_corpus_command(&parts[1..])?,
        "debug" => parse_debug_command(&parts[1..])?,
        "providers" => Command::Providers,
        _ => parse_ask_command(&parts)?,
    };
    Ok(ReplCommand::Command(command))
}

fn parse_ask_command(args: &[&str]) -> Result<Command> {
    let mut ask = AskArgs {
        text: Vec::new(),
        debug: false,
        all: false,
    };
    for arg in args {
        match *arg {
            "--all" | "-a" => ask.all = true,
            "--debug" | "-d" => ask.debug = true,
            word => ask.text.push(word.to_string()),
        }
    }
    if ask.text.is_empty() {
        return Err(CliError::InvalidInput("Usage: ask [--all] [--debug] <request>".to_string()));
    }
    Ok(Command::Ask(ask))
}

fn parse_config_command(args: &[&str]) -> Result<Command> {
    let value = |usage: &str| {
        args.get(1)
            .map(|s| s.to_string())
            .ok_or_else(|| CliError::InvalidInput(format!("Usage: config {}", usage)))
    };

    let action = match args.first().copied().unwrap_or("show") {
        "show" => ConfigAction::Show,
        "test" => ConfigAction::Test,
        "set-provider" => ConfigAction::SetProvider {
            provider: value("set-provider <provider>")?,
        },
        "set-model" => ConfigAction::SetModel {
            model: value("set-model <model>")?,
        },
        "set-key" => ConfigAction::SetKey {
            key: value("set-key <key>")?,
        },
        "set-url" => ConfigAction::SetUrl {
            url: args.get(1).map(|s| s.to_string()),
        },
        other => {
            return Err(CliError::InvalidInput(format!("Unknown config action: {}", other)));
        }
    };
    Ok(Command::Config(ConfigArgs { action }))
}

fn parse_schema_command(args: &[&str]) -> Result<Command> {
    let action = match args.first().copied().unwrap_or("show") {
        "show" => SchemaAction::Show,
        "import" => {
            let file = args.get(1).ok_or_else(|| {
                CliError::InvalidInput("Usage: schema import <file> [index]".to_string())
            })?;
            SchemaAction::Import {
                file: PathBuf::from(file),
                index: args.get(2).map(|s| s.to_string()),
            }
        }
        other => {
            return Err(CliError::InvalidInput(format!("Unknown schema action: {}", other)));
        }
    };
    Ok(Command::Schema(SchemaArgs { action }))
}

fn parse_corpus_command(args: &[&str]) -> Result<Command> {
    let action = match args.first().copied().unwrap_or("list") {
        "list" => CorpusAction::List,
        "import" => {
            let file = args.get(1).ok_or_else(|| {
                CliError::InvalidInput("Usage: corpus import <file> [--append]".to_string())
            })?;
            CorpusAction::Import {
                file: PathBuf::from(file),
                append: args[2..].contains(&"--append"),
            }
        }
        other => {
            return Err(CliError::InvalidInput(format!("Unknown corpus action: {}", other)));
        }
    };
    Ok(Command::Corpus(CorpusArgs { action }))
}

fn parse_debug_command(args: &[&str]) -> Result<Command> {
    let state = match args.first().copied() {
        Some("on") => Toggle::On,
        Some("off") => Toggle::Off,
        _ => return Err(CliError::InvalidInput("Usage: debug on|off".to_string())),
    };
    Ok(Command::Debug(DebugArgs { state }))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <request>                        - Build a query for a request");
    println!("  ask [--all] [--debug] <request>  - Same, with options");
    println!("    --all: show every candidate");
    println!("    --debug: include agent logs");
    println!("  config [show|test]               - Show or test provider settings");
    println!("  config set-provider <provider>   - gemini|openai|anthropic|ollama");
    println!("  config set-model <model>         - Select the model");
    println!("  config set-key <key>             - Store the API key");
    println!("  config set-url [url]             - Override or clear the endpoint");
    println!("  schema show                      - Show the index schema");
    println!("  schema import <file> [index]     - Import a schema or mapping");
    println!("  corpus list                      - List sample queries");
    println!("  corpus import <file> [--append]  - Import sample queries");
    println!("  debug on|off                     - Toggle agent logs");
    println!("  providers                        - List providers");
    println!("  help, ?                          - Show this help");
    println!("  exit, quit, q                    - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> Command {
        match parse_repl_command(line).unwrap() {
            ReplCommand::Command(cmd) => cmd,
            other => panic!("Expected a command, got {:?}", other),
        }
    }

    #[test]
    fn test_exit_and_help() {
        assert!(matches!(parse_repl_command("quit"), Ok(ReplCommand::Exit)));
        assert!(matches!(parse_repl_command("?"), Ok(ReplCommand::Help)));
    }

    #[test]
    fn test_plain_text_is_a_request() {
        match command("senior rust jobs in Berlin") {
            Command::Ask(args) => {
                assert_eq!(args.request(), "senior rust jobs in Berlin");
                assert!(!args.all);
            }
            other => panic!("Expected Ask, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_flags() {
        match command("ask --all --debug jobs at Acme") {
            Command::Ask(args) => {
                assert_eq!(args.request(), "jobs at Acme");
                assert!(args.all);
                assert!(args.debug);
            }
            other => panic!("Expected Ask, got {:?}", other),
        }
        assert!(parse_repl_command("ask --all").is_err());
    }

    #[test]
    fn test_config_actions() {
        assert!(matches!(
            command("config"),
            Command::Config(ConfigArgs {
                action: ConfigAction::Show
            })
        ));
        match command("config set-model gpt-4") {
            Command::Config(ConfigArgs {
                action: ConfigAction::SetModel { model },
            }) => assert_eq!(model, "gpt-4"),
            other => panic!("Expected SetModel, got {:?}", other),
        }
        assert!(parse_repl_command("config set-key").is_err());
        assert!(parse_repl_command("config frobnicate").is_err());
    }

    #[test]
    fn test_schema_and_corpus() {
        match command("schema import mapping.json jobs") {
            Command::Schema(SchemaArgs {
                action: SchemaAction::Import { file, index },
            }) => {
                assert_eq!(file, PathBuf::from("mapping.json"));
                assert_eq!(index.as_deref(), Some("jobs"));
            }
            other => panic!("Expected schema import, got {:?}", other),
        }
        match command("corpus import samples.json --append") {
            Command::Corpus(CorpusArgs {
                action: CorpusAction::Import { append, .. },
            }) => assert!(append),
            other => panic!("Expected corpus import, got {:?}", other),
        }
        assert!(parse_repl_command("corpus import").is_err());
    }

    #[test]
    fn test_debug_toggle() {
        assert!(matches!(
            command("debug off"),
            Command::Debug(DebugArgs { state: Toggle::Off })
        ));
        assert!(parse_repl_command("debug").is_err());
    }
}
