//! Raw dot-env decoder.
//!
//! Responsibilities:
//! - Turn dot-env text into an ordered table of raw (uninterpolated) values.
//! - Strip one layer of quotes, keeping embedded newlines of multi-line values.
//!
//! Does NOT handle:
//! - `$VAR` interpolation or escapes (see `interpolate.rs`).
//!
//! Invariants:
//! - Table order is first-appearance order; a repeated key keeps its first
//!   position and takes the last value.
//! - Diagnostics never include line contents, only 1-based line numbers.

use crate::EnvMap;
use crate::error::EnvError;

const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Decode dot-env contents, skipping malformed lines.
///
/// Each skipped line is reported through `tracing::warn!` with its line
/// number.
pub fn decode(contents: &str) -> EnvMap {
    let mut table = EnvMap::new();
    for entry in Entries::new(contents) {
        match entry {
            Ok((key, value)) => {
                table.insert(key, value);
            }
            Err(line) => tracing::warn!(line, "Skipping malformed dot-env line"),
        }
    }
    table
}

/// Decode dot-env contents, failing on the first malformed line.
pub fn try_decode(contents: &str) -> Result<EnvMap, EnvError> {
    let mut table = EnvMap::new();
    for entry in Entries::new(contents) {
        let (key, value) = entry.map_err(|line| EnvError::MalformedLine { line })?;
        table.insert(key, value);
    }
    Ok(table)
}

/// Iterator over `(key, value)` pairs; `Err` carries a malformed line number.
struct Entries {
    lines: Vec<String>,
    next: usize,
}

impl Entries {
    fn new(contents: &str) -> Self {
        let normalized = contents.trim().replace("\r\n", "\n").replace('\r', "\n");
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
            next: 0,
        }
    }
}

impl Iterator for Entries {
    type Item = Result<(String, String), usize>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = self.next;
            let line = self.lines.get(index)?.trim();
            self.next += 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line
                .strip_prefix("export ")
                .map(str::trim_start)
                .unwrap_or(line);

            let Some((key, rest)) = line.split_once('=') else {
                return Some(Err(index + 1));
            };
            let key = key.trim();
            if key.is_empty() {
                return Some(Err(index + 1));
            }

            let key = key.to_string();
            let rest = rest.trim().to_string();
            let value = self.read_value(&rest);
            return Some(Ok((key, value)));
        }
    }
}

impl Entries {
    /// Read the value starting at `rest`, consuming continuation lines of a
    /// multi-line quoted value.
    fn read_value(&mut self, rest: &str) -> String {
        let Some(quote) = rest.chars().next().filter(|c| QUOTES.contains(c)) else {
            return strip_inline_comment(rest).to_string();
        };

        let mut buffer = rest[quote.len_utf8()..].to_string();
        let mut consumed = 0;
        loop {
            if let Some(end) = find_closing_quote(&buffer, quote) {
                self.next += consumed;
                buffer.truncate(end);
                return if quote == '"' {
                    expand_newlines(&buffer)
                } else {
                    buffer
                };
            }
            match self.lines.get(self.next + consumed) {
                Some(line) => {
                    buffer.push('\n');
                    buffer.push_str(line);
                    consumed += 1;
                }
                // Unterminated: keep the line as written.
                None => return rest.to_string(),
            }
        }
    }
}

/// Byte index of the first unescaped `quote` in `text`.
fn find_closing_quote(text: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(index);
        }
    }
    None
}

/// Drop a trailing ` # comment` from an unquoted value.
fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == b'#' && index > 0 && bytes[index - 1].is_ascii_whitespace() {
            return value[..index].trim_end();
        }
    }
    value
}

/// Expand `\n` and `\r` inside double-quoted values; other escapes are kept
/// for the interpolation stage.
fn expand_newlines(value: &str) -> String {
    value.replace("\\n", "\n").replace("\\r", "\r")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_key_value_pairs_in_order() {
        let table = decode("PORT=3333\nHOST = 127.0.0.1 \n\n# comment\nEMPTY=");

        let entries: Vec<_> = table.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            entries,
            vec![("PORT", "3333"), ("HOST", "127.0.0.1"), ("EMPTY", "")]
        );
    }

    #[test]
    fn test_decode_keeps_escapes_and_references_raw() {
        let table = decode("PASSWORD=pa\\$\\$word\nURL=http://$HOST:${PORT}");

        assert_eq!(table["PASSWORD"], "pa\\$\\$word");
        assert_eq!(table["URL"], "http://$HOST:${PORT}");
    }

    #[test]
    fn test_decode_strips_one_layer_of_quotes() {
        let table = decode("A=\"hello world\"\nB='single'\nC=`tick`\nD=\"'inner'\"");

        assert_eq!(table["A"], "hello world");
        assert_eq!(table["B"], "single");
        assert_eq!(table["C"], "tick");
        assert_eq!(table["D"], "'inner'");
    }

    #[test]
    fn test_decode_multiline_quoted_value_preserves_indentation() {
        let contents = "KEY=\"--BEGIN CERTIFICATE--\n      --END CERTIFICATE--\"\nNEXT=1";
        let table = decode(contents);

        assert_eq!(table["KEY"], "--BEGIN CERTIFICATE--\n      --END CERTIFICATE--");
        assert_eq!(table["NEXT"], "1");
    }

    #[test]
    fn test_decode_expands_newline_escapes_in_double_quotes_only() {
        let table = decode("A=\"one\\ntwo\"\nB='one\\ntwo'\nC=\"cost \\$5\"");

        assert_eq!(table["A"], "one\ntwo");
        assert_eq!(table["B"], "one\\ntwo");
        assert_eq!(table["C"], "cost \\$5");
    }

    #[test]
    fn test_decode_inline_comments_and_export_prefix() {
        let table = decode("export PORT=3000 # web port\nHASH=abc#def\nQUOTED=\"a # b\" # c");

        assert_eq!(table["PORT"], "3000");
        assert_eq!(table["HASH"], "abc#def");
        assert_eq!(table["QUOTED"], "a # b");
    }

    #[test]
    fn test_decode_repeated_key_keeps_position_takes_last_value() {
        let table = decode("A=1\nB=2\nA=3");

        let keys: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(table["A"], "3");
    }

    #[test]
    fn test_decode_handles_crlf_and_unterminated_quote() {
        let table = decode("A=1\r\nB=\"open\r\nC=3");

        assert_eq!(table["A"], "1");
        assert_eq!(table["B"], "\"open");
        assert_eq!(table["C"], "3");
    }

    #[test]
    fn test_decode_skips_malformed_lines() {
        let table = decode("GOOD=1\nNOT_A_PAIR\n=orphan\nALSO_GOOD=2");

        assert_eq!(table.len(), 2);
        assert_eq!(table["ALSO_GOOD"], "2");
    }

    #[test]
    fn test_try_decode_reports_line_without_content() {
        let secret = "supersecret_token_12345";
        let err = try_decode(&format!("TOKEN=abc\n{secret}")).unwrap_err();

        match err {
            EnvError::MalformedLine { line } => assert_eq!(line, 2),
            other => panic!("expected MalformedLine, got {other}"),
        }
        let message = try_decode(secret).unwrap_err().to_string();
        assert!(!message.contains(secret), "Error leaked line content: {message}");
    }

    #[test]
    fn test_decode_empty_contents() {
        assert!(decode("").is_empty());
        assert!(decode("   \n\n  ").is_empty());
    }
}
