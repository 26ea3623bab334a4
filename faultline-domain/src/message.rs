//! Human-readable error messages
//!
//! Shared by the status fallback and the logger. A message looks like
//!
//! ```text
//! src/db.rs:42: verify!(rows < limit)
//! while loading the index
//! Same as: verify!(120 < 100)
//! Culprit: Timeout {
//!              after: 3s,
//!          }
//! ```
//!
//! The location prefix is only used for status messages. Continuation lines of
//! a prefixed section are indented to line up under the prefix.

use crate::description::{builder_description, policy_description};
use faultline_core::{ErrorMaker, MacroKind};
use std::fmt::{self, Write};

/// Which parts of a message to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStyle {
    location: bool,
    culprit: bool,
}

impl MessageStyle {
    /// Log records: no location prefix, the logger reports it separately
    pub fn log() -> Self {
        Self {
            location: false,
            culprit: true,
        }
    }

    /// Status messages: prefixed with `file:line: `
    pub fn status() -> Self {
        Self {
            location: true,
            culprit: true,
        }
    }

    /// Leave out the culprit section
    pub fn without_culprit(mut self) -> Self {
        self.culprit = false;
        self
    }
}

/// Writer that indents every non-empty line by the current indent
#[derive(Debug, Default)]
pub(crate) struct IndentWriter {
    buf: String,
    indent: usize,
}

impl IndentWriter {
    #[cfg(test)]
    fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }

    /// Start a new line with `prefix`, indenting what follows under it
    pub(crate) fn prefix(&mut self, prefix: &str) {
        self.indent = 0;
        self.buf.push('\n');
        self.buf.push_str(prefix);
        self.indent = prefix.len();
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }

    fn push(&mut self, c: char) {
        let line_start = self.buf.is_empty() || self.buf.ends_with('\n');
        if line_start && c != '\n' {
            self.buf.extend(std::iter::repeat(' ').take(self.indent));
        }
        self.buf.push(c);
    }
}

impl Write for IndentWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.chars().for_each(|c| self.push(c));
        Ok(())
    }
}

/// Assemble the message for the failure `maker` describes
pub fn format_message(maker: &dyn ErrorMaker, style: MessageStyle) -> String {
    let mut out = IndentWriter::default();
    // Writing into a String cannot fail.
    let _ = write_message(&mut out, maker, style);
    out.into_string()
}

fn write_message(
    out: &mut IndentWriter,
    maker: &dyn ErrorMaker,
    style: MessageStyle,
) -> fmt::Result {
    let ctx = maker.context();
    if style.location {
        write!(out, "{}: ", ctx.location)?;
    }
    let mut has_headline = false;
    if ctx.kind != MacroKind::Error {
        out.write_str(&ctx.invocation())?;
        has_headline = true;
    }
    for description in [policy_description(maker), builder_description(maker)] {
        let description = description.trim();
        if description.is_empty() {
            continue;
        }
        if has_headline {
            out.write_char('\n')?;
        }
        out.write_str(description)?;
        has_headline = true;
    }
    if !has_headline {
        out.write_str(&ctx.invocation())?;
    }
    if let Some(relation) = &ctx.relation {
        out.prefix("Same as: ");
        write!(out, "{}!({})", ctx.macro_name, relation)?;
    }
    if style.culprit {
        if let Some(culprit) = maker.render_culprit() {
            out.prefix("Culprit: ");
            out.write_str(culprit.trim_end())?;
        }
    }
    Ok(())
}
