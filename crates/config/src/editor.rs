//! Line-level editing of `.env` and `.env.example`.
//!
//! Responsibilities:
//! - Load the existing `.env` and `.env.example` files of an app.
//! - Add or update `KEY=value` lines, optionally blanking example values.
//! - Persist edits atomically.
//!
//! Does NOT handle:
//! - Creating missing files; only files that already exist are edited.
//! - Quoting or escaping values; lines are written verbatim.
//!
//! Invariants:
//! - Untouched lines, including comments and blank lines, are preserved.
//! - Writes are atomic (temp file in the same directory + rename).

use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::ambient::Environment;
use crate::constants::{DOTENV_EXAMPLE_FILE, DOTENV_FILE};
use crate::error::EnvError;
use crate::loader::EnvLoader;

/// An editable dot-env file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditableFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl EditableFile {
    fn is_example(&self) -> bool {
        self.path
            .file_name()
            .is_some_and(|name| name == DOTENV_EXAMPLE_FILE)
    }

    fn upsert(&mut self, key: &str, line: String) {
        let prefix = format!("{key}=");
        match self.lines.iter_mut().find(|existing| existing.starts_with(&prefix)) {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }
}

/// Edits the `.env` and `.env.example` files of an app.
#[derive(Debug, Clone)]
pub struct EnvEditor {
    files: Vec<EditableFile>,
}

impl EnvEditor {
    /// Load the existing `.env` and `.env.example` files under `app_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be located or read.
    pub fn create(app_root: impl Into<PathBuf>, env: &dyn Environment) -> Result<Self, EnvError> {
        let candidates = EnvLoader::new(app_root).include_example(true).load(env)?;

        let files = candidates
            .into_iter()
            .filter(|file| {
                file.exists && matches!(file.file_name(), Some(DOTENV_FILE | DOTENV_EXAMPLE_FILE))
            })
            .map(|file| EditableFile {
                lines: file.contents.trim().lines().map(str::to_string).collect(),
                path: file.path,
            })
            .collect();

        Ok(Self { files })
    }

    /// Set `key` to `value` in every file.
    ///
    /// The first line starting with `KEY=` is replaced; otherwise the entry is
    /// appended. With `with_empty_example_value`, `.env.example` gets `KEY=`.
    pub fn add(&mut self, key: &str, value: impl std::fmt::Display, with_empty_example_value: bool) {
        for file in &mut self.files {
            let line = if with_empty_example_value && file.is_example() {
                format!("{key}=")
            } else {
                format!("{key}={value}")
            };
            file.upsert(key, line);
        }
    }

    pub fn files(&self) -> &[EditableFile] {
        &self.files
    }

    /// Write every file back to disk.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Write` if a file cannot be written.
    pub fn save(&self) -> Result<(), EnvError> {
        for file in &self.files {
            atomic_write(&file.path, &file.lines.join("\n"))?;
            tracing::debug!(path = %file.path.display(), "Env file saved atomically");
        }
        Ok(())
    }
}

fn atomic_write(path: &Path, contents: &str) -> Result<(), EnvError> {
    let write_error = |source| EnvError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp_file.write_all(contents.as_bytes()).map_err(write_error)?;
    temp_file
        .persist(path)
        .map_err(|err| write_error(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::MemoryEnvironment;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(temp_dir.path().join(name), contents).unwrap();
        }
        temp_dir
    }

    fn editor(temp_dir: &TempDir) -> EnvEditor {
        EnvEditor::create(temp_dir.path(), &MemoryEnvironment::new()).unwrap()
    }

    fn lines(file: &EditableFile) -> Vec<&str> {
        file.lines.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_add_key_to_env_files() {
        let temp_dir = setup(&[(".env", ""), (".env.example", "")]);
        let mut editor = editor(&temp_dir);

        editor.add("PORT", 3000, false);

        let files = editor.files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, temp_dir.path().join(".env"));
        assert_eq!(lines(&files[0]), vec!["PORT=3000"]);
        assert_eq!(files[1].path, temp_dir.path().join(".env.example"));
        assert_eq!(lines(&files[1]), vec!["PORT=3000"]);
    }

    #[test]
    fn test_missing_files_are_not_created() {
        let temp_dir = setup(&[(".env", "")]);
        let mut editor = editor(&temp_dir);

        editor.add("PORT", 3000, false);
        editor.save().unwrap();

        assert_eq!(editor.files().len(), 1);
        assert!(!temp_dir.path().join(".env.example").exists());
    }

    #[test]
    fn test_other_env_files_are_ignored() {
        let temp_dir = setup(&[(".env", ""), (".env.local", "")]);
        let mut editor = editor(&temp_dir);

        editor.add("PORT", 3000, false);
        editor.save().unwrap();

        assert_eq!(editor.files().len(), 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join(".env.local")).unwrap(), "");
    }

    #[test]
    fn test_update_existing_key() {
        let temp_dir = setup(&[(".env", "PORT=3333"), (".env.example", "PORT=4000")]);
        let mut editor = editor(&temp_dir);

        editor.add("PORT", 3000, false);

        assert_eq!(lines(&editor.files()[0]), vec!["PORT=3000"]);
        assert_eq!(lines(&editor.files()[1]), vec!["PORT=3000"]);
    }

    #[test]
    fn test_update_in_one_file_and_append_in_another() {
        let temp_dir = setup(&[(".env", "PORT=3333\n\nHOST=localhost"), (".env.example", "")]);
        let mut editor = editor(&temp_dir);

        editor.add("PORT", 3000, false);

        assert_eq!(lines(&editor.files()[0]), vec!["PORT=3000", "", "HOST=localhost"]);
        assert_eq!(lines(&editor.files()[1]), vec!["PORT=3000"]);
    }

    #[test]
    fn test_prefix_match_requires_equals_sign() {
        let temp_dir = setup(&[(".env", "PORT_NUMBER=1\nPORT=2")]);
        let mut editor = editor(&temp_dir);

        editor.add("PORT", 3000, false);

        assert_eq!(lines(&editor.files()[0]), vec!["PORT_NUMBER=1", "PORT=3000"]);
    }

    #[test]
    fn test_save_persists_changes_repeatedly() {
        let temp_dir = setup(&[(".env", "PORT=3333\n\nHOST=localhost"), (".env.example", "")]);
        let mut editor = editor(&temp_dir);
        let read = |name: &str| fs::read_to_string(temp_dir.path().join(name)).unwrap();

        editor.add("PORT", 3000, false);
        editor.save().unwrap();
        assert_eq!(read(".env"), "PORT=3000\n\nHOST=localhost");
        assert_eq!(read(".env.example"), "PORT=3000");

        editor.add("HOST", "127.0.0.1", false);
        editor.save().unwrap();
        assert_eq!(read(".env"), "PORT=3000\n\nHOST=127.0.0.1");
        assert_eq!(read(".env.example"), "PORT=3000\nHOST=127.0.0.1");
    }

    #[test]
    fn test_empty_example_value() {
        let temp_dir = setup(&[(".env", ""), (".env.example", "")]);
        let mut editor = editor(&temp_dir);

        editor.add("PORT", 3000, true);

        assert_eq!(lines(&editor.files()[0]), vec!["PORT=3000"]);
        assert_eq!(lines(&editor.files()[1]), vec!["PORT="]);
    }

    #[test]
    fn test_files_serialize_to_json() {
        let temp_dir = setup(&[(".env", "A=1")]);
        let editor = editor(&temp_dir);

        let json = serde_json::to_value(editor.files()).unwrap();
        assert_eq!(json[0]["lines"][0], "A=1");
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let temp_dir = setup(&[(".env", "A=1")]);
        let mut editor = editor(&temp_dir);

        editor.add("B", 2, false);
        editor.save().unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(".env")]);
    }
}
