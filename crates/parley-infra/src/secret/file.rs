//! Dotenv-style secret file provider.
//!
//! Reads `KEY=VALUE` lines from a local file (by default `.secret.local` in
//! the data directory). Blank lines and `#` comments are ignored, an
//! `export ` prefix is accepted, and values may be wrapped in single or
//! double quotes. Unquoted values drop a trailing ` # comment`; double-quoted
//! values understand the usual backslash escapes. Variable interpolation and
//! multi-line values are not supported. A missing file simply provides nothing.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parley_core::secret::SecretProvider;
use parley_types::error::RepositoryError;

/// File name looked up in the data directory.
pub const SECRET_FILE_NAME: &str = ".secret.local";

#[derive(Debug, Clone)]
pub struct FileSecretProvider {
    path: PathBuf,
}

impl FileSecretProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{data_dir}/.secret.local`
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SECRET_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse dotenv-style content into a key/value map. Later keys win.
pub fn parse_secret_file(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        values.insert(key.to_string(), parse_value(value.trim()));
    }
    values
}

/// Resolve the raw right-hand side of a line.
///
/// Double-quoted values honor `\n`, `\t`, `\"` and `\\`. Single-quoted
/// values are literal. Unquoted values end at a ` #` inline comment.
fn parse_value(raw: &str) -> String {
    if let Some(inner) = quoted(raw, '"') {
        return unescape(inner);
    }
    if let Some(inner) = quoted(raw, '\'') {
        return inner.to_string();
    }
    let value = match raw.find(" #").or_else(|| raw.find("\t#")) {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    value.trim_end().to_string()
}

/// Contents of a value wrapped in `quote`, ignoring a trailing comment.
fn quoted(raw: &str, quote: char) -> Option<&str> {
    let rest = raw.strip_prefix(quote)?;
    let mut escaped = false;
    for (idx, c) in rest.char_indices() {
        match c {
            '\\' if quote == '"' && !escaped => escaped = true,
            c if c == quote && !escaped => {
                let tail = rest[idx + 1..].trim_start();
                return (tail.is_empty() || tail.starts_with('#')).then(|| &rest[..idx]);
            }
            _ => escaped = false,
        }
    }
    None
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl SecretProvider for FileSecretProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(RepositoryError::Io(format!(
                    "read {}: {err}",
                    self.path.display()
                )));
            }
        };
        Ok(parse_secret_file(&content).remove(key))
    }
}
