//! Clipboard backed by the platform's copy utility.

use std::io::Write;
use std::process::{Command, Stdio};

use sportshop_core::{Clipboard, CoreError};

/// Copy utilities tried in order; the first one that runs wins.
const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip.exe", &[]),
];

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemClipboard;

/// Writes `text` to the program's stdin. The child is always waited on,
/// even when the write fails.
fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;
    Ok(status.success())
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), CoreError> {
        for (program, args) in COPY_COMMANDS {
            match pipe_into(program, args, text) {
                Ok(true) => {
                    tracing::debug!(%program, "copied to clipboard");
                    return Ok(());
                }
                Ok(false) => tracing::debug!(%program, "copy utility exited with an error"),
                Err(_) => {}
            }
        }
        Err(CoreError::ClipboardUnavailable)
    }
}
