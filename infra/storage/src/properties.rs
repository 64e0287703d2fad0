//! Line format of the file backend.
//!
//! ```text
//! # comment
//! category=ciphertext
//! ```
//!
//! Keys and values are backslash-escaped: `\\`, `\=`, `\n`, `\r`, `\t`, and a leading
//! `\#` or `\!` in keys. Blank lines and lines starting with `#` or `!` are ignored.

use crate::error::StorageError;
use std::collections::BTreeMap;

pub(crate) const HEADER: &str = "# Lockbox ciphertext store: one `category=ciphertext` entry per line";

pub(crate) fn parse(text: &str) -> Result<BTreeMap<String, String>, StorageError> {
    let mut entries = BTreeMap::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let number = index + 1;
        let (key, value) = split_entry(line).ok_or_else(|| StorageError::Format {
            message: format!("line {number}: missing '=' separator").into(),
            context: None,
        })?;

        entries.insert(unescape(key, number)?, unescape(value, number)?);
    }

    Ok(entries)
}

pub(crate) fn render(entries: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + entries.len() * 64);
    out.push_str(HEADER);
    out.push('\n');

    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

// Splits on the first '=' that is not preceded by an escaping backslash.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '=' if !escaped => return Some((&line[..i], &line[i + 1..])),
            _ => escaped = false,
        }
    }
    None
}

fn escape(input: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, c) in input.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '=' => out.push_str("\\="),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '#' | '!' if is_key && i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn unescape(input: &str, line: usize) -> Result<String, StorageError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {
                return Err(StorageError::Format {
                    message: format!("line {line}: dangling escape").into(),
                    context: None,
                });
            }
        }
    }
    Ok(out)
}
