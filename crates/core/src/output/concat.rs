//! Concatenation list building.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::resolver::{basename, dirname, extension};

/// Default base name of a concatenated output.
pub const DEFAULT_CONCAT_NAME: &str = "concat";

/// Output path plus the concat demuxer entries for a set of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatPlan {
    /// Where the joined file is written.
    pub output: String,
    /// One `file '<absolute-path>'` line per input, in order.
    pub entries: Vec<String>,
}

impl ConcatPlan {
    /// Writes the entries to a fresh temp file, one per line.
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn write_list(&self) -> io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("recoder-concat-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(self.list_contents().as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    /// The list file contents.
    pub fn list_contents(&self) -> String {
        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(entry);
            contents.push('\n');
        }
        contents
    }
}

/// Builds the concat plan with the default base name.
///
/// See [`concat_list_named`].
pub fn concat_list(output: Option<&str>, inputs: &[String]) -> ConcatPlan {
    concat_list_named(output, inputs, DEFAULT_CONCAT_NAME)
}

/// Builds the concat plan, naming a defaulted output `base_name`.
///
/// The output extension is taken from the first input:
/// - no output: `<base_name><ext>`
/// - a bare name without extension: `<name><ext>`
/// - a directory (`/tmp/`, or `/tmp/movies` with no extension):
///   `<dir>/<base_name><ext>`
/// - anything else is used verbatim
pub fn concat_list_named(output: Option<&str>, inputs: &[String], base_name: &str) -> ConcatPlan {
    let default_ext = inputs.first().map(|i| extension(i)).unwrap_or("");
    let default_name = format!("{}{}", base_name, default_ext);

    let output = match output {
        None | Some("") => default_name,
        Some(out) if basename(out) == out && extension(out).is_empty() => {
            format!("{}{}", out, default_ext)
        }
        Some(out) if basename(out).is_empty() || dirname(out) == out => {
            format!("{}{}", with_separator(out), default_name)
        }
        Some(out) if extension(out).is_empty() => {
            format!("{}/{}", out, default_name)
        }
        Some(out) => out.to_string(),
    };

    let entries = inputs
        .iter()
        .map(|input| format!("file '{}'", escape_quotes(&absolute(input))))
        .collect();

    ConcatPlan { output, entries }
}

fn with_separator(dir: &str) -> String {
    if dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{}/", dir)
    }
}

fn absolute(input: &str) -> String {
    let path = Path::new(input);
    if path.is_absolute() {
        return input.to_string();
    }
    std::path::absolute(path)
        .or_else(|_| std::env::current_dir().map(|cwd| cwd.join(path)))
        .unwrap_or_else(|_| PathBuf::from(input))
        .to_string_lossy()
        .into_owned()
}

/// Escapes single quotes for the concat demuxer's quoting rules.
fn escape_quotes(path: &str) -> String {
    path.replace('\'', r"'\''")
}
