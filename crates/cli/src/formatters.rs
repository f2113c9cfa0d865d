//! Output formatting for CLI commands.
//!
//! Responsibilities:
//! - Render merged tables as dot-env text or JSON.
//! - Render candidate file listings as a table or JSON.
//!
//! Does NOT handle:
//! - Writing output (commands print the returned strings).
//!
//! Invariants:
//! - Dot-env output decodes and interpolates back to the same values; a value
//!   no quoting style can carry is an error, never silently altered.
//! - File listings never include file contents.

use anyhow::{Context, Result};
use envlayer_config::{
    CandidateFile, EnvMap,
    parser::{decode, try_decode},
};
use serde::Serialize;

/// Summary of a candidate file, safe to print.
#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub path: String,
    pub exists: bool,
    pub keys: usize,
}

impl From<&CandidateFile> for FileSummary {
    fn from(file: &CandidateFile) -> Self {
        Self {
            path: file.path.display().to_string(),
            exists: file.exists,
            keys: decode(&file.contents).len(),
        }
    }
}

pub fn format_files_table(files: &[FileSummary]) -> String {
    let mut output = format!("{:<8} {:>4}  {}\n", "STATUS", "KEYS", "PATH");
    for file in files {
        let status = if file.exists { "found" } else { "missing" };
        output.push_str(&format!("{:<8} {:>4}  {}\n", status, file.keys, file.path));
    }
    output
}

pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

pub fn format_dotenv(values: &EnvMap) -> Result<String> {
    let mut output = String::new();
    for (key, value) in values {
        let quoted = quote_value(value)
            .with_context(|| format!("Value of {key} cannot be written as a dot-env value"))?;
        output.push_str(&format!("{key}={quoted}\n"));
    }
    Ok(output)
}

/// Quote a value so decoding and interpolation yield it unchanged.
///
/// Returns `None` when no quoting style decodes back to the same text.
fn quote_value(value: &str) -> Option<String> {
    let escaped = value.replace('$', "\\$");

    // Double quotes are the only style that can carry `\r`.
    let double = escaped.replace('\n', "\\n").replace('\r', "\\r");
    let candidates = [
        escaped.clone(),
        format!("'{escaped}'"),
        format!("\"{double}\""),
        format!("`{escaped}`"),
    ];

    candidates.into_iter().find(|candidate| {
        try_decode(&format!("KEY={candidate}"))
            .is_ok_and(|table| table.get("KEY") == Some(&escaped))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use envlayer_config::{EnvParser, MemoryEnvironment};
    use std::path::PathBuf;

    fn round_trip(value: &str) -> String {
        let mut values = EnvMap::new();
        values.insert("KEY".to_string(), value.to_string());
        let parsed = EnvParser::new()
            .parse(&format_dotenv(&values).unwrap(), &MemoryEnvironment::new())
            .unwrap();
        parsed["KEY"].clone()
    }

    #[test]
    fn test_plain_values_are_unquoted() {
        let mut values = EnvMap::new();
        values.insert("PORT".to_string(), "3000".to_string());
        values.insert("URL".to_string(), "http://localhost:3000".to_string());

        assert_eq!(
            format_dotenv(&values).unwrap(),
            "PORT=3000\nURL=http://localhost:3000\n"
        );
    }

    #[test]
    fn test_dollar_signs_are_escaped() {
        assert_eq!(quote_value("pa$$word").as_deref(), Some("pa\\$\\$word"));
        assert_eq!(round_trip("pa$$word"), "pa$$word");
    }

    #[test]
    fn test_special_values_survive_parsing() {
        for value in [
            "",
            "hello world # not a comment",
            " padded ",
            "it's",
            "line one\nline two",
            "say \"hi\"\nnow",
            "a'b\"c`d",
            "carriage\rreturn",
            "trailing\\",
            "C:\\$HOME\\",
            "indented\n    continuation",
        ] {
            assert_eq!(round_trip(value), value, "value {value:?} should survive");
        }
    }

    #[test]
    fn test_values_that_cannot_be_quoted_are_rejected() {
        for value in ["x #\\", " lead\\", "quotes 'a' \"b\" `c` # and a comment"] {
            assert_eq!(quote_value(value), None, "value {value:?} has no safe quoting");

            let mut values = EnvMap::new();
            values.insert("KEY".to_string(), value.to_string());
            let err = format_dotenv(&values).unwrap_err();
            assert!(err.to_string().contains("KEY"));
        }
    }

    #[test]
    fn test_files_table_lists_status_and_key_count() {
        let files = vec![
            FileSummary::from(&CandidateFile {
                path: PathBuf::from("/app/.env.local"),
                contents: String::new(),
                exists: false,
            }),
            FileSummary::from(&CandidateFile {
                path: PathBuf::from("/app/.env"),
                contents: "A=1\nB=2".to_string(),
                exists: true,
            }),
        ];

        let table = format_files_table(&files);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "STATUS   KEYS  PATH");
        assert_eq!(lines[1], "missing     0  /app/.env.local");
        assert_eq!(lines[2], "found       2  /app/.env");
    }
}
