//! Turns scene text into a `ParsedScnFile`.
//!
//! Both pipelines count commands first, reserve exactly that many slots and
//! then fill them in order. A bad line never stops the scan; its errors are
//! collected and its slot is left empty.

use std::path::Path;

use tracing::{debug, warn};

use super::commands::{self, CommandError, CommandResult};
use super::lexer::{self, Token, TokenKind};
use super::split::SplitIter;
use crate::fs::FileSystem;
use crate::model::{
    COMMAND_MARKER, CommandKind, CommandSlot, Diagnostic, Keyword, ParsedScnFile,
};

struct Collector<'p> {
    source_path: &'p Path,
    slots: Vec<CommandSlot>,
    diagnostics: Vec<Diagnostic>,
}

impl<'p> Collector<'p> {
    fn new(source_path: &'p Path, n_cmds: usize) -> Self {
        Self {
            source_path,
            slots: Vec::with_capacity(n_cmds),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, line: u32, column: Option<u32>, err: &CommandError) {
        warn!(
            path = %self.source_path.display(),
            line,
            column,
            "{err}"
        );
        let diag = Diagnostic::new(line, err.to_string());
        self.diagnostics.push(match column {
            Some(column) => diag.with_column(column),
            None => diag,
        });
    }

    /// Stores one slot. `locate` gives the line and column of each error.
    fn fill(
        &mut self,
        line: u32,
        result: CommandResult<CommandKind>,
        locate: impl Fn(&CommandError) -> (u32, Option<u32>),
    ) {
        let command = match result {
            Ok(kind) => {
                debug!(line, command = kind.keyword().name(), "parsed command");
                Some(kind)
            }
            Err(errors) => {
                for err in &errors {
                    let (err_line, column) = locate(err);
                    self.report(err_line, column, err);
                }
                None
            }
        };
        self.slots.push(CommandSlot {
            line_number: line,
            command,
        });
    }

    fn finish(self, n_cmds: usize) -> (ParsedScnFile, Vec<Diagnostic>) {
        debug_assert_eq!(
            self.slots.len(),
            n_cmds,
            "filled command slots must match the counting pass"
        );
        let parsed = ParsedScnFile {
            source_path: self.source_path.to_path_buf(),
            slots: self.slots,
        };
        (parsed, self.diagnostics)
    }
}

/// A command line starts with the marker, ignoring leading whitespace.
pub fn is_command_line(line: &str) -> bool {
    line.trim_start().starts_with(COMMAND_MARKER)
}

// ─────────────────────────────────────────────────────
// Line pipeline
// ─────────────────────────────────────────────────────

/// Line-oriented two-pass parse.
///
/// Blank lines are skipped. A non-blank line without the `:` marker is
/// reported as an unrecognized command and does not get a slot.
pub fn parse_lines(
    text: &str,
    source_path: &Path,
    fs: &impl FileSystem,
) -> (ParsedScnFile, Vec<Diagnostic>) {
    let mut lines = SplitIter::new(text, '\n');

    // 1. ── Count ──────────────────────────────────────────────────────
    let n_cmds = lines.by_ref().filter(|line| is_command_line(line)).count();
    debug!(lines = lines.token_count(), n_cmds, "counted command lines");

    // 2. ── Populate ───────────────────────────────────────────────────
    lines.restart();
    let mut out = Collector::new(source_path, n_cmds);

    loop {
        let line_number = lines.seen_seps() as u32 + 1;
        let Some(raw) = lines.next() else { break };
        let line = raw.trim_end_matches('\r').trim_start();

        if line.trim_end().is_empty() {
            continue;
        }

        let Some(body) = line.strip_prefix(COMMAND_MARKER) else {
            out.report(line_number, None, &commands::unrecognized(line));
            continue;
        };

        let (name, rest) = body.split_once(' ').unwrap_or((body, ""));
        let args: Vec<&str> = SplitIter::new(rest, ' ').collect();

        let result = match Keyword::from_name(name) {
            Some(kw) => commands::parse_command(kw, &args, fs),
            None => Err(vec![commands::unrecognized(line)]),
        };
        out.fill(line_number, result, |_| (line_number, None));
    }

    out.finish(n_cmds)
}

// ─────────────────────────────────────────────────────
// Token pipeline
// ─────────────────────────────────────────────────────

/// Lexer-driven parse. Every token up to the next command token is an
/// argument of the preceding command, whatever line it sits on.
///
/// A lex error ends the parse with a single diagnostic and no slots.
pub fn parse_tokens(
    text: &str,
    source_path: &Path,
    fs: &impl FileSystem,
) -> (ParsedScnFile, Vec<Diagnostic>) {
    let tokens = match lexer::tokenize(text) {
        Ok(tokens) => tokens,
        Err(err) => {
            warn!(path = %source_path.display(), line = err.line, column = err.column, "{}", err.message);
            let parsed = ParsedScnFile {
                source_path: source_path.to_path_buf(),
                slots: Vec::new(),
            };
            let diag = Diagnostic::new(err.line, err.message).with_column(err.column);
            return (parsed, vec![diag]);
        }
    };
    parse_token_stream(&tokens, source_path, fs)
}

pub fn parse_token_stream(
    tokens: &[Token<'_>],
    source_path: &Path,
    fs: &impl FileSystem,
) -> (ParsedScnFile, Vec<Diagnostic>) {
    let n_cmds = tokens.iter().filter(|t| t.kind.is_command()).count();
    debug!(tokens = tokens.len(), n_cmds, "counted command tokens");

    let mut out = Collector::new(source_path, n_cmds);
    let mut idx = 0;
    while idx < tokens.len() {
        let head = &tokens[idx];
        let n_args = tokens[idx + 1..]
            .iter()
            .take_while(|t| !t.kind.is_command())
            .count();
        let args = &tokens[idx + 1..idx + 1 + n_args];
        idx += 1 + n_args;

        let at_head = |_: &CommandError| (head.line, Some(head.col_start));
        match &head.kind {
            TokenKind::Command(kw) => {
                let result = commands::parse_command(*kw, args, fs);
                out.fill(head.line, result, |err| {
                    match err.argument_index(*kw).and_then(|i| args.get(i)) {
                        Some(arg) => (arg.line, Some(arg.col_start)),
                        None => at_head(err),
                    }
                });
            }
            TokenKind::UnknownCommand(_) => {
                let err = commands::unrecognized(head.text);
                out.fill(head.line, Err(vec![err]), at_head);
            }
            // only possible before the first command
            _ => out.report(head.line, Some(head.col_start), &commands::unrecognized(head.text)),
        }
    }

    out.finish(n_cmds)
}
