//! Interactive session
//!
//! One ledger, one set of input buffers and one assistant response for the
//! life of the shell. Errors are reported and the loop carries on.

use std::path::PathBuf;

use clap::ValueEnum;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use scentvalue_app::config::Config;
use scentvalue_app::export::{format_grouped, format_net};
use scentvalue_app::repository::open_session_ledger;
use scentvalue_app::session::{Session, QUICK_QUESTIONS};
use scentvalue_domain::LedgerStore;
use scentvalue_types::{Error, OutputFormat, Result, ScannerMode};
use tracing::debug;

use crate::cli::{CopyTarget, ExportKind};
use crate::commands::{ask_with_spinner, build_assistant, cmd_copy, cmd_export, cmd_scan, cmd_upload};
use crate::output::{output_entry, output_ledger, output_total};

const HELP_TEXT: &str = "\
Commands:
  weight <expr>          set the weight input (e.g. 1kg136, 500g+20g)
  label <name>           set the fragrance name for the next entry
  preview                show the resolved weight and price
  submit                 add the current input to the batch
  list | total | clear   show, total or empty the batch
  copy [text|csv|item]   copy the batch to the clipboard
  export <xlsx|pdf|csv>  write the batch to a file
  ask <question>         ask the fragrance assistant
  quick [n]              list or ask a suggested question
  scan [single|batch]    photograph a scale or document
  upload <path> [mode]   read an image file (batch by default)
  dismiss                hide the camera warning
  help | exit";

#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Weight(String),
    Label(String),
    Preview,
    Submit,
    List,
    Total,
    Clear,
    Copy(CopyTarget),
    Export(ExportKind),
    Ask(String),
    Quick(Option<usize>),
    Scan(ScannerMode),
    Upload { source: String, mode: ScannerMode },
    Dismiss,
    Help,
    Exit,
}

enum LoopControl {
    Continue,
    Exit,
}

struct ShellContext {
    config: Config,
    session: Session<Box<dyn LedgerStore>>,
    output_format: OutputFormat,
}

pub async fn run(config: &Config, ledger_path: Option<PathBuf>, output_format: OutputFormat) -> Result<()> {
    let ledger = open_session_ledger(config, ledger_path)?;
    let session = Session::new(ledger, build_assistant(config));
    let mut context = ShellContext {
        config: config.clone(),
        session,
        output_format,
    };

    let mut editor = DefaultEditor::new().map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
    println!("ScentValue shell. Type 'help' for commands.");

    loop {
        let line = editor.readline(&prompt(&context.session));

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                let command = match parse_line(trimmed) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        eprintln!("{}", message);
                        continue;
                    }
                };

                match dispatch(&mut context, command).await {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(Error::Io(std::io::Error::other(e.to_string()))),
        }
    }

    Ok(())
}

fn prompt<S: LedgerStore>(session: &Session<S>) -> String {
    if session.weight_input().is_empty() {
        "scentvalue> ".to_string()
    } else {
        format!("scentvalue [{}]> ", session.weight_input())
    }
}

fn parse_line(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let tokens = shell_words::split(line).map_err(|e| format!("Could not parse line: {}", e))?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };
    let rest = args.join(" ");

    let command = match head.to_lowercase().as_str() {
        "weight" | "w" => ShellCommand::Weight(rest),
        "label" | "l" => ShellCommand::Label(rest),
        "preview" | "p" => ShellCommand::Preview,
        "submit" | "add" => ShellCommand::Submit,
        "list" | "ls" => ShellCommand::List,
        "total" => ShellCommand::Total,
        "clear" => ShellCommand::Clear,
        "copy" => ShellCommand::Copy(match args.first() {
            Some(target) => CopyTarget::from_str(target, true)?,
            None => CopyTarget::Text,
        }),
        "export" => match args.first() {
            Some(kind) => ShellCommand::Export(ExportKind::from_str(kind, true)?),
            None => return Err("Usage: export <xlsx|pdf|csv>".to_string()),
        },
        "ask" => {
            if rest.trim().is_empty() {
                return Err("Usage: ask <question>".to_string());
            }
            ShellCommand::Ask(rest)
        }
        "quick" => match args.first() {
            Some(n) => match n.parse::<usize>().ok().filter(|n| quick_question(*n).is_some()) {
                Some(n) => ShellCommand::Quick(Some(n)),
                None => return Err(format!("Usage: quick [1-{}]", QUICK_QUESTIONS.len())),
            },
            None => ShellCommand::Quick(None),
        },
        "scan" => ShellCommand::Scan(match args.first() {
            Some(mode) => ScannerMode::from_str(mode, true)?,
            None => ScannerMode::Single,
        }),
        "upload" => match args {
            [source] => ShellCommand::Upload {
                source: source.clone(),
                mode: ScannerMode::Batch,
            },
            [source, mode] => ShellCommand::Upload {
                source: source.clone(),
                mode: ScannerMode::from_str(mode, true)?,
            },
            _ => return Err("Usage: upload <path|data-url> [single|batch]".to_string()),
        },
        "dismiss" => ShellCommand::Dismiss,
        "help" | "?" => ShellCommand::Help,
        "exit" | "quit" | "q" => ShellCommand::Exit,
        other => return Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
    };

    Ok(Some(command))
}

async fn dispatch(context: &mut ShellContext, command: ShellCommand) -> Result<LoopControl> {
    debug!(?command, "shell command");
    let session = &mut context.session;

    match command {
        ShellCommand::Weight(expr) => {
            session.set_weight_input(expr);
            print_preview(session);
        }
        ShellCommand::Label(label) => session.set_label_input(label),
        ShellCommand::Preview => print_preview(session),
        ShellCommand::Submit => match session.submit()? {
            Some(entry) => output_entry(context.output_format, &entry, session.ledger().pricing())?,
            None => println!("Nothing added: enter a weight greater than zero."),
        },
        ShellCommand::List => {
            let ledger = session.ledger();
            output_ledger(context.output_format, &ledger.entries()?, ledger.pricing())?;
        }
        ShellCommand::Total => {
            let ledger = session.ledger();
            output_total(context.output_format, ledger.count()?, ledger.total()?, ledger.pricing())?;
        }
        ShellCommand::Clear => {
            session.ledger_mut().clear()?;
            println!("Batch cleared");
        }
        ShellCommand::Copy(target) => cmd_copy(&context.config, session.ledger(), target, None, false)?,
        ShellCommand::Export(kind) => cmd_export(session.ledger(), kind, &context.config.export_dir())?,
        ShellCommand::Ask(query) => println!("{}", ask_with_spinner(session, &query).await),
        ShellCommand::Quick(None) => {
            for (i, question) in QUICK_QUESTIONS.iter().enumerate() {
                println!("  {}. {}", i + 1, question);
            }
        }
        ShellCommand::Quick(Some(n)) => match quick_question(n) {
            Some(question) => println!("{}", ask_with_spinner(session, question).await),
            None => println!("Usage: quick [1-{}]", QUICK_QUESTIONS.len()),
        },
        ShellCommand::Scan(mode) => {
            cmd_scan(&context.config, session, mode, context.output_format).await?;
        }
        ShellCommand::Upload { source, mode } => {
            cmd_upload(session, &source, mode, context.output_format).await?;
        }
        ShellCommand::Dismiss => session.dismiss_camera_warning(),
        ShellCommand::Help => println!("{}", HELP_TEXT),
        ShellCommand::Exit => return Ok(LoopControl::Exit),
    }

    Ok(LoopControl::Continue)
}

/// Suggested question by its 1-based number
fn quick_question(n: usize) -> Option<&'static str> {
    n.checked_sub(1).and_then(|i| QUICK_QUESTIONS.get(i)).copied()
}

fn print_preview<S: LedgerStore>(session: &Session<S>) {
    let currency = &session.ledger().pricing().currency;
    match session.preview() {
        Ok(p) if p.is_submittable() => println!(
            "{}g -> {}ml net, {} {}",
            format_grouped(p.gross_weight),
            format_net(p.valuation.net_weight),
            format_grouped(p.valuation.price),
            currency
        ),
        Ok(_) => println!("Enter a weight greater than zero."),
        Err(e) => println!("Invalid weight: {}", e),
    }
}
