/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use nom::error::Error as NomError;
use thiserror::Error;

/// Everything the crate can fail with. Parse errors carry a rendered
/// diagnostic; a failed load leaves nothing behind.
#[derive(Debug, Error)]
pub enum RdfError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unbound variable: ?{0}")]
    UnboundVariable(String),
}

/// Render a nom error over `input` as a line/column diagnostic with a caret
/// under the offending position.
pub fn format_syntax_error(input: &str, err: nom::Err<NomError<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let error_pos = e.input;
            let error_description = match e.code {
                nom::error::ErrorKind::Tag => ". Expected a specific tag or token",
                nom::error::ErrorKind::Char => ". Expected a specific character",
                nom::error::ErrorKind::Alt => ". Expected one of several alternatives",
                _ => "",
            };

            let offset = input.len() - error_pos.len();
            let mut line_no = 1;
            let mut col_no = 1;

            for (i, c) in input.char_indices() {
                if i >= offset {
                    break;
                }
                if c == '\n' {
                    line_no += 1;
                    col_no = 1;
                } else {
                    col_no += 1;
                }
            }

            let lines: Vec<&str> = input.lines().collect();
            let error_line = if line_no <= lines.len() {
                lines[line_no - 1]
            } else {
                "[end of input]"
            };

            format!(
                "\nSyntax error at line {}, column {}{}:\n{}\n{}^ Here\n",
                line_no,
                col_no,
                error_description,
                error_line,
                " ".repeat(col_no - 1)
            )
        }
        nom::Err::Incomplete(_) => {
            "Incomplete input: the parser needs more input to complete parsing".to_string()
        }
    }
}

/// Like [`format_syntax_error`], but query-shaped mistakes are scanned for
/// first so the common ones get a targeted message instead of a bare caret.
pub fn format_query_error(input: &str, err: nom::Err<NomError<&str>>) -> String {
    if let Some(error_msg) = scan_for_query_errors(input) {
        return error_msg;
    }
    format_syntax_error(input, err)
}

// Aggregator of the manual checks
fn scan_for_query_errors(input: &str) -> Option<String> {
    let lines: Vec<&str> = input.lines().collect();

    if let Some(error_msg) = check_for_select_missing_where(input) {
        return Some(error_msg);
    }
    if let Some(error_msg) = check_for_unterminated_strings(&lines) {
        return Some(error_msg);
    }
    if let Some(error_msg) = check_for_mismatched_braces(&lines) {
        return Some(error_msg);
    }
    None
}

// Naive check for SELECT queries missing WHERE, and the reverse
fn check_for_select_missing_where(input: &str) -> Option<String> {
    let lower = input.to_lowercase();
    let has_select = lower.contains("select");
    let has_where = lower.contains("where");

    if has_select && !has_where {
        return Some("\nFound 'SELECT' but no corresponding 'WHERE' clause.\n".to_string());
    }
    if has_where && !has_select {
        return Some("\nFound 'WHERE' but no 'SELECT' clause.\n".to_string());
    }
    None
}

// A quote count per line, ignoring escaped quotes; literals cannot span lines
fn check_for_unterminated_strings(lines: &[&str]) -> Option<String> {
    for (line_idx, line) in lines.iter().enumerate() {
        let mut in_string = false;
        let mut string_start = 0;
        let mut escaped = false;
        for (char_idx, c) in line.char_indices() {
            if escaped {
                escaped = false;
            } else if in_string && c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = !in_string;
                if in_string {
                    string_start = char_idx;
                }
            }
        }
        if in_string {
            return Some(format!(
                "\nUnterminated string literal at line {}:\n{}\n{}^ String not closed\n",
                line_idx + 1,
                line,
                " ".repeat(string_start)
            ));
        }
    }
    None
}

// Mismatched braces, localized to the first line where the counts diverge
fn check_for_mismatched_braces(lines: &[&str]) -> Option<String> {
    let total_open: usize = lines.iter().map(|line| line.matches('{').count()).sum();
    let total_close: usize = lines.iter().map(|line| line.matches('}').count()).sum();
    if total_open == total_close {
        return None;
    }

    let mut open_count = 0;
    let mut close_count = 0;
    for (line_idx, line) in lines.iter().enumerate() {
        let line_open = line.matches('{').count();
        let line_close = line.matches('}').count();
        open_count += line_open;
        close_count += line_close;
        if open_count != close_count && (line_open > 0 || line_close > 0) {
            let brace_pos = if line_open > line_close {
                line.rfind('{').unwrap_or(0)
            } else {
                line.find('}').unwrap_or(0)
            };
            return Some(format!(
                "\nMismatched braces at line {}:\n{}\n{}^ Here\n(Found {} '{{' vs. {} '}}')\n",
                line_idx + 1,
                line,
                " ".repeat(brace_pos),
                total_open,
                total_close
            ));
        }
    }
    Some(format!(
        "\nMismatched braces in query:\n(Found {} '{{' vs. {} '}}')\n",
        total_open, total_close
    ))
}
