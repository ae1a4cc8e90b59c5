//! Line input for the interactive chat.
//!
//! rustyline blocks, so the editor lives on its own thread. The async side asks
//! for a line with [`LineReader::prompt`] and receives it through
//! [`LineReader::next`], which can be raced against session events.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::{Result, anyhow};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

/// rustyline helper completing and highlighting slash commands.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new(commands: &[&str]) -> Self {
        Self {
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// What the user did at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// CTRL-C
    Interrupted,
    /// CTRL-D or the terminal went away.
    Closed,
}

pub struct LineReader {
    prompts: std::sync::mpsc::Sender<String>,
    lines: mpsc::UnboundedReceiver<Input>,
}

impl LineReader {
    /// Starts the editor thread with completion for `commands`.
    pub fn spawn(commands: &[&str]) -> Result<Self> {
        let (prompt_tx, prompt_rx) = std::sync::mpsc::channel::<String>();
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<(), String>>();
        let helper = CliHelper::new(commands);

        std::thread::Builder::new()
            .name("arcana-readline".to_string())
            .spawn(move || {
                let mut editor: Editor<CliHelper, DefaultHistory> = match Editor::new() {
                    Ok(editor) => editor,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                editor.set_helper(Some(helper));
                let _ = ready_tx.send(Ok(()));

                while let Ok(prompt) = prompt_rx.recv() {
                    let input = match editor.readline(&prompt) {
                        Ok(line) => {
                            if !line.trim().is_empty() {
                                let _ = editor.add_history_entry(line.as_str());
                            }
                            Input::Line(line)
                        }
                        Err(ReadlineError::Interrupted) => Input::Interrupted,
                        Err(ReadlineError::Eof) => Input::Closed,
                        Err(e) => {
                            tracing::warn!(error = %e, "readline failed");
                            Input::Closed
                        }
                    };
                    let closed = input == Input::Closed;
                    if line_tx.send(input).is_err() || closed {
                        break;
                    }
                }
            })?;

        ready_rx
            .recv()
            .map_err(|_| anyhow!("Line editor thread exited"))?
            .map_err(|e| anyhow!("Failed to start line editor: {e}"))?;

        Ok(Self {
            prompts: prompt_tx,
            lines: line_rx,
        })
    }

    /// Shows `prompt`; the answer arrives through [`Self::next`].
    pub fn prompt(&self, prompt: &str) -> bool {
        self.prompts.send(prompt.to_string()).is_ok()
    }

    /// Next answer. Cancel safe.
    pub async fn next(&mut self) -> Input {
        self.lines.recv().await.unwrap_or(Input::Closed)
    }
}

/// One-off blocking prompt for non-interactive subcommands.
pub fn ask(prompt: &str) -> Result<String> {
    let mut editor = rustyline::DefaultEditor::new()?;
    match editor.readline(prompt) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(anyhow!("Cancelled")),
        Err(e) => Err(e.into()),
    }
}
