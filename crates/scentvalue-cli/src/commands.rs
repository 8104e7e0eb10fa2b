//! Command handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use scentvalue_app::capture::{CAMERA_BLOCKED_MESSAGE, SCANNING_MESSAGE};
use scentvalue_app::config::Config;
use scentvalue_app::export::{batch_summary, csv_text, export_to_csv, export_to_excel, export_to_pdf, item_summary};
use scentvalue_app::repository::{open_persistent_ledger, open_session_ledger};
use scentvalue_app::session::{Preview, Session, HELP_QUESTION};
use scentvalue_domain::{calculate_price, resolve_weight, BatchLedger, LedgerEntry, LedgerStore};
use scentvalue_infra::{Clipboard, CommandCamera, CommandClipboard};
use scentvalue_types::{CaptureError, ConfigError, Error, OutputFormat, Result, ScannerMode};
use scentvalue_vision::{Assistant, GeminiAssistant};
use tracing::warn;

use crate::cli::{Cli, Commands, CopyTarget, ExportKind};
use crate::output::{output_capture, output_entry, output_ledger, output_resolution, output_total};
use crate::shell;

pub async fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if cli.ledger.is_some() {
        config.ledger_path = cli.ledger.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Resolve { expression } => cmd_resolve(&config, expression, output_format),

        Commands::Add { weight, label } => cmd_add(&config, weight, label.as_deref(), output_format),

        Commands::List => {
            let ledger = open_persistent_ledger(&config, None)?;
            output_ledger(output_format, &ledger.entries()?, ledger.pricing())
        }

        Commands::Total => {
            let ledger = open_persistent_ledger(&config, None)?;
            output_total(output_format, ledger.count()?, ledger.total()?, ledger.pricing())
        }

        Commands::Clear => {
            let mut ledger = open_persistent_ledger(&config, None)?;
            let removed = ledger.count()?;
            ledger.clear()?;
            println!("Cleared {} entries", removed);
            Ok(())
        }

        Commands::Copy { target, id, stdout } => {
            let ledger = open_persistent_ledger(&config, None)?;
            cmd_copy(&config, &ledger, *target, id.as_deref(), *stdout)
        }

        Commands::Export { kind, dir } => {
            let ledger = open_persistent_ledger(&config, None)?;
            let dir = dir.clone().unwrap_or_else(|| config.export_dir());
            cmd_export(&ledger, *kind, &dir)
        }

        Commands::Ask { question } => {
            let mut session = open_ask_session(&config)?;
            let answer = ask_with_spinner(&mut session, &ask_query(question)).await;
            println!("{}", answer);
            Ok(())
        }

        Commands::Scan { mode } => {
            let mut session = open_session(&config)?;
            cmd_scan(&config, &mut session, *mode, output_format).await
        }

        Commands::Upload { source, mode } => {
            let mut session = open_session(&config)?;
            cmd_upload(&mut session, source, *mode, output_format).await
        }

        Commands::Shell => shell::run(&config, cli.ledger.clone(), output_format).await,

        Commands::Config {
            show,
            set_tare,
            set_rate,
            set_currency,
            set_model,
            set_api_base_url,
            set_api_key,
            set_camera_command,
            set_camera_width,
            set_camera_height,
            set_clipboard_command,
            set_export_dir,
            set_ledger_path,
            set_output,
            reset,
        } => cmd_config(
            *show,
            ConfigChanges {
                tare: *set_tare,
                rate: *set_rate,
                currency: set_currency.clone(),
                model: set_model.clone(),
                api_base_url: set_api_base_url.clone(),
                api_key: set_api_key.clone(),
                camera_command: set_camera_command.clone(),
                camera_width: *set_camera_width,
                camera_height: *set_camera_height,
                clipboard_command: set_clipboard_command.clone(),
                export_dir: set_export_dir.clone(),
                ledger_path: set_ledger_path.clone(),
                output_format: *set_output,
            },
            *reset,
        ),
    }
}

/// Network-backed assistant built from config
pub fn build_assistant(config: &Config) -> Arc<dyn Assistant> {
    Arc::new(GeminiAssistant::new(&config.assistant_config(), config.pricing()))
}

fn open_session(config: &Config) -> Result<Session<Box<dyn LedgerStore>>> {
    let ledger = open_persistent_ledger(config, None)?;
    Ok(Session::new(ledger, build_assistant(config)))
}

/// Questions never touch the batch, so the ledger file is not opened
fn open_ask_session(config: &Config) -> Result<Session<Box<dyn LedgerStore>>> {
    let ledger = open_session_ledger(config, None)?;
    Ok(Session::new(ledger, build_assistant(config)))
}

/// Words joined into one question; none means the help question
fn ask_query(question: &[String]) -> String {
    if question.is_empty() {
        HELP_QUESTION.to_string()
    } else {
        question.join(" ")
    }
}

fn cmd_resolve(config: &Config, expression: &str, output_format: OutputFormat) -> Result<()> {
    let pricing = config.pricing();
    let preview = resolve_weight(expression).map(|gross_weight| Preview {
        gross_weight,
        valuation: calculate_price(gross_weight, &pricing),
    });
    output_resolution(output_format, expression, &preview, &pricing)
}

fn cmd_add(config: &Config, weight: &str, label: Option<&str>, output_format: OutputFormat) -> Result<()> {
    let gross_weight = resolve_weight(weight).map_err(|e| Error::InvalidWeight(e.to_string()))?;

    let mut ledger = open_persistent_ledger(config, None)?;
    match ledger.add_entry(gross_weight, label)? {
        Some(entry) => output_entry(output_format, &entry, ledger.pricing()),
        None => Err(Error::InvalidWeight(format!(
            "{} resolves to {}g; weight must be greater than zero",
            weight, gross_weight
        ))),
    }
}

pub(crate) fn cmd_copy<S: LedgerStore>(
    config: &Config,
    ledger: &BatchLedger<S>,
    target: CopyTarget,
    id: Option<&str>,
    stdout: bool,
) -> Result<()> {
    let entries = ledger.entries()?;
    if entries.is_empty() {
        println!("Pending batch is empty. Nothing to copy.");
        return Ok(());
    }

    let text = match target {
        CopyTarget::Text => batch_summary(&entries, ledger.pricing()),
        CopyTarget::Csv => csv_text(&entries, ledger.pricing())?,
        CopyTarget::Item => {
            let entry = find_entry(&entries, id)?;
            item_summary(entry, ledger.pricing())
        }
    };

    copy_text(config, &text, stdout)
}

fn find_entry<'a>(entries: &'a [LedgerEntry], id: Option<&str>) -> Result<&'a LedgerEntry> {
    match id {
        Some(id) => entries
            .iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string())),
        None => entries
            .first()
            .ok_or_else(|| Error::EntryNotFound("(newest)".to_string())),
    }
}

/// Clipboard when possible, stdout otherwise
pub(crate) fn copy_text(config: &Config, text: &str, stdout: bool) -> Result<()> {
    if stdout {
        println!("{}", text);
        return Ok(());
    }

    let clipboard = CommandClipboard::new(config.clipboard_command.as_deref());
    match clipboard.write_text(text) {
        Ok(()) => {
            println!("Copied to clipboard");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, command = clipboard.command(), "clipboard unavailable");
            eprintln!("Clipboard unavailable, printing instead:");
            println!("{}", text);
            Ok(())
        }
    }
}

pub(crate) fn cmd_export<S: LedgerStore>(
    ledger: &BatchLedger<S>,
    kind: ExportKind,
    dir: &Path,
) -> Result<()> {
    let entries = ledger.entries()?;
    let written: Option<PathBuf> = match kind {
        ExportKind::Xlsx => export_to_excel(&entries, ledger.pricing(), dir)?,
        ExportKind::Pdf => export_to_pdf(&entries, ledger.pricing(), dir)?,
        ExportKind::Csv => export_to_csv(&entries, ledger.pricing(), dir)?,
    };

    match written {
        Some(path) => println!("Exported to: {}", path.display()),
        None => println!("Pending batch is empty. Nothing to export."),
    }
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub(crate) async fn ask_with_spinner<S: LedgerStore>(session: &mut Session<S>, query: &str) -> String {
    let pb = spinner("Asking the fragrance assistant...");
    let answer = session.ask(query).await.to_string();
    pb.finish_and_clear();
    answer
}

pub(crate) async fn cmd_scan<S: LedgerStore>(
    config: &Config,
    session: &mut Session<S>,
    mode: ScannerMode,
    output_format: OutputFormat,
) -> Result<()> {
    let Some(command) = config.camera_command.as_deref() else {
        eprintln!("{}", CAMERA_BLOCKED_MESSAGE);
        return Err(CaptureError::DeviceUnavailable(
            "no camera command configured (scentvalue config --set-camera-command ...)".to_string(),
        )
        .into());
    };

    let camera = CommandCamera::new(command);
    let pb = spinner(SCANNING_MESSAGE);
    let result = session
        .scan_with_camera(&camera, &config.camera_constraints(), mode)
        .await;
    pb.finish_and_clear();

    if let Some(warning) = session.camera_warning() {
        eprintln!("{}", warning);
    }
    let outcome = result?;
    output_capture(output_format, &outcome)?;
    print_prefill_hint(session);
    Ok(())
}

pub(crate) async fn cmd_upload<S: LedgerStore>(
    session: &mut Session<S>,
    source: &str,
    mode: ScannerMode,
    output_format: OutputFormat,
) -> Result<()> {
    let pb = spinner(SCANNING_MESSAGE);
    let result = session.upload(source, mode).await;
    pb.finish_and_clear();

    let outcome = result?;
    output_capture(output_format, &outcome)?;
    print_prefill_hint(session);
    Ok(())
}

fn print_prefill_hint<S: LedgerStore>(session: &Session<S>) {
    if !session.weight_input().is_empty() {
        eprintln!("Weight input set to {}g; confirm it with add/submit.", session.weight_input());
    }
}

/// Values from `config --set-*`
struct ConfigChanges {
    tare: Option<f64>,
    rate: Option<f64>,
    currency: Option<String>,
    model: Option<String>,
    api_base_url: Option<String>,
    api_key: Option<String>,
    camera_command: Option<String>,
    camera_width: Option<u32>,
    camera_height: Option<u32>,
    clipboard_command: Option<String>,
    export_dir: Option<PathBuf>,
    ledger_path: Option<PathBuf>,
    output_format: Option<OutputFormat>,
}

impl ConfigChanges {
    /// Apply to `config`; returns whether anything changed
    fn apply(self, config: &mut Config) -> bool {
        let mut modified = false;

        if let Some(tare) = self.tare {
            config.tare_grams = tare;
            modified = true;
        }
        if let Some(rate) = self.rate {
            config.rate_per_gram = rate;
            modified = true;
        }
        if let Some(currency) = self.currency {
            config.currency = currency;
            modified = true;
        }
        if let Some(model) = self.model {
            config.model = Some(model);
            modified = true;
        }
        if let Some(url) = self.api_base_url {
            config.api_base_url = Some(url);
            modified = true;
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
            modified = true;
        }
        if let Some(cmd) = self.camera_command {
            config.camera_command = Some(cmd);
            modified = true;
        }
        if let Some(width) = self.camera_width {
            config.camera_width = width;
            modified = true;
        }
        if let Some(height) = self.camera_height {
            config.camera_height = height;
            modified = true;
        }
        if let Some(cmd) = self.clipboard_command {
            config.clipboard_command = Some(cmd);
            modified = true;
        }
        if let Some(dir) = self.export_dir {
            config.export_dir = Some(dir);
            modified = true;
        }
        if let Some(path) = self.ledger_path {
            config.ledger_path = Some(path);
            modified = true;
        }
        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
            modified = true;
        }

        modified
    }
}

fn cmd_config(show: bool, changes: ConfigChanges, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = changes.apply(&mut config);

    if modified {
        if !(config.tare_grams.is_finite() && config.tare_grams >= 0.0) {
            return Err(ConfigError::InvalidValue("tare must be a non-negative number".to_string()).into());
        }
        if !(config.rate_per_gram.is_finite() && config.rate_per_gram >= 0.0) {
            return Err(ConfigError::InvalidValue("rate must be a non-negative number".to_string()).into());
        }
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
