//! Command composition and record decoding for format queries.
//!
//! A query serialises to a single command line carrying a `-F` (or `-p` for
//! `display-message`) format directive whose template joins `#{var}` tokens
//! with a sentinel separator. Reply lines split on the same separator; the
//! final field keeps any embedded separators because tmux values can
//! legitimately contain it.

use std::collections::HashMap;

use crate::error::Error;
use crate::router::CommandResult;

/// Separator between record fields, chosen to be improbable in tmux output.
pub(crate) const RECORD_SEPARATOR: &str = "-:-";

/// Builder for one format query.
#[derive(Debug, Clone, Default)]
pub(crate) struct Query {
    command: Vec<String>,
    flag_args: Vec<String>,
    pos_args: Vec<String>,
    variables: Vec<String>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a base command keyword.
    pub(crate) fn cmd(mut self, keyword: &str) -> Self {
        self.command.push(keyword.to_string());
        self
    }

    /// Append flag-argument tokens (e.g. `-t`, `target`).
    pub(crate) fn fargs(mut self, args: &[&str]) -> Self {
        self.flag_args.extend(args.iter().map(|arg| arg.to_string()));
        self
    }

    /// Append positional argument tokens.
    pub(crate) fn pargs(mut self, args: &[&str]) -> Self {
        self.pos_args.extend(args.iter().map(|arg| arg.to_string()));
        self
    }

    /// Set the field variables the reply should carry.
    pub(crate) fn vars(mut self, variables: &[&str]) -> Self {
        self.variables = variables.iter().map(|var| var.to_string()).collect();
        self
    }

    pub(crate) fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Serialise: base keywords, flag args, format directive when variables
    /// are present, then positional args, joined by single spaces.
    pub(crate) fn build(&self) -> Result<String, Error> {
        if self.command.is_empty() {
            return Err(Error::EmptyCommand);
        }

        let mut parts: Vec<String> =
            Vec::with_capacity(self.command.len() + self.flag_args.len() + self.pos_args.len() + 2);
        parts.extend(self.command.iter().cloned());
        parts.extend(self.flag_args.iter().cloned());

        if !self.variables.is_empty() {
            let template = self
                .variables
                .iter()
                .map(|var| format!("#{{{var}}}"))
                .collect::<Vec<_>>()
                .join(RECORD_SEPARATOR);
            let flag = if self.command[0] == "display-message" {
                "-p"
            } else {
                "-F"
            };
            parts.push(flag.to_string());
            parts.push(format!("'{template}'"));
        }

        parts.extend(self.pos_args.iter().cloned());

        Ok(parts.join(" "))
    }
}

/// A completed query: the command result plus the variables it asked for.
pub(crate) struct QueryOutput {
    result: CommandResult,
    variables: Vec<String>,
}

impl QueryOutput {
    pub(crate) fn new(result: CommandResult, variables: Vec<String>) -> Self {
        Self { result, variables }
    }

    /// Decode every non-empty reply line into a record.
    pub(crate) fn collect(&self) -> Vec<QueryRecord> {
        let mut records = Vec::new();
        if self.variables.is_empty() {
            return records;
        }

        for line in &self.result.lines {
            if line.is_empty() {
                continue;
            }
            records.push(decode_record(line, &self.variables));
        }

        records
    }

    /// First decoded record, or an empty one.
    pub(crate) fn one(&self) -> QueryRecord {
        self.collect().into_iter().next().unwrap_or_default()
    }

    /// Raw reply lines joined with newlines.
    pub(crate) fn raw(&self) -> String {
        self.result.lines.join("\n")
    }

    pub(crate) fn result(&self) -> &CommandResult {
        &self.result
    }
}

/// Split one reply line into named fields.
///
/// Strips one pair of surrounding single quotes, splits on the sentinel
/// into at most `variables.len()` values (the last keeps embedded
/// separators), and pads with empty strings when tmux returned fewer.
pub(crate) fn decode_record(line: &str, variables: &[String]) -> QueryRecord {
    let mut stripped = line;
    if let Some(rest) = stripped.strip_prefix('\'') {
        stripped = rest;
        if let Some(rest) = stripped.strip_suffix('\'') {
            stripped = rest;
        }
    }

    let mut values: Vec<&str> = stripped.splitn(variables.len(), RECORD_SEPARATOR).collect();
    values.resize(variables.len(), "");

    let fields = variables
        .iter()
        .zip(values)
        .map(|(name, value)| (name.clone(), value.to_string()))
        .collect();
    QueryRecord { fields }
}

/// One decoded reply record: variable name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueryRecord {
    fields: HashMap<String, String>,
}

impl QueryRecord {
    /// Value for a variable; empty when absent.
    pub(crate) fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// Flag field: tmux renders true as `1`.
    pub(crate) fn flag(&self, key: &str) -> bool {
        self.get(key) == "1"
    }

    /// Numeric field, lenient: garbage decodes to zero.
    pub(crate) fn int(&self, key: &str) -> i64 {
        self.get(key).parse().unwrap_or(0)
    }

    /// Comma-separated list field.
    pub(crate) fn list(&self, key: &str) -> Vec<String> {
        let value = self.get(key);
        if value.is_empty() {
            return Vec::new();
        }
        value.split(',').map(str::to_string).collect()
    }
}

/// Join raw command parts into one line, single-quoting any part that
/// contains shell metacharacters.
pub(crate) fn build_command(parts: &[&str]) -> Result<String, Error> {
    if parts.is_empty() {
        return Err(Error::EmptyCommand);
    }
    Ok(parts
        .iter()
        .map(|part| quote_argument(part))
        .collect::<Vec<_>>()
        .join(" "))
}

pub(crate) fn quote_argument(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    if arg.contains([' ', '\t', '\n', '\'', '"', '\\']) {
        let escaped = arg.replace('\'', "'\\''");
        return format!("'{escaped}'");
    }
    arg.to_string()
}

/// Session names may not be empty or contain `:` or `.`, which tmux
/// reserves for target syntax.
pub(crate) fn check_session_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(':') && !name.contains('.')
}
