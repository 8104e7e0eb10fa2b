//! System clipboard via a platform copy command

use std::io::Write;
use std::process::{Command, Stdio};

use scentvalue_types::{Error, Result};
use tracing::debug;

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Pipes text into the stdin of a copy command such as `pbcopy`
pub struct CommandClipboard {
    command: String,
}

impl CommandClipboard {
    /// Use `command` when given, otherwise the platform default
    pub fn new(command: Option<&str>) -> Self {
        let command = command
            .map(str::to_string)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_command().to_string());
        Self { command }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

fn default_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "pbcopy"
    } else if cfg!(target_os = "windows") {
        "clip"
    } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        "wl-copy"
    } else {
        "xclip -selection clipboard"
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let parts = shell_words::split(&self.command)
            .map_err(|e| Error::Clipboard(format!("invalid clipboard command: {}", e)))?;
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| Error::Clipboard("clipboard command is empty".to_string()))?;

        debug!(program = %program, bytes = text.len(), "writing clipboard");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Clipboard(format!("{}: {}", program, e)))?;

        // stdin drops after the write so the command sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Clipboard(e.to_string()))?;
        if let Err(e) = written {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Clipboard(format!(
                "could not write to {}: {} {}",
                program,
                e,
                stderr.trim()
            )));
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Clipboard(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
