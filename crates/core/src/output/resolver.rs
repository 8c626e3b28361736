//! Output path resolution.
//!
//! An output spec is overloaded: it can be a directory, a bare extension,
//! an extension under a directory, or a complete file name. A leading `+`
//! makes the result relative to the input's directory.

/// Marker for "relative to the input's directory".
const INPUT_RELATIVE: char = '+';

/// Resolves the output path for `input` given the user's output spec.
///
/// | spec         | input           | result           |
/// |--------------|-----------------|------------------|
/// | `/tmp/`      | `/film/foo.m2t` | `/tmp/foo.m2t`   |
/// | `/tmp`       | `foo.m2t`       | `/tmp/foo.m2t`   |
/// | `.mkv`       | `/film/foo.m2t` | `/film/foo.mkv`  |
/// | `/tmp/.mkv`  | `/film/foo.m2t` | `/tmp/foo.mkv`   |
/// | `+.mkv`      | `/film/foo.m2t` | `/film/foo.mkv`  |
/// | `out.mkv`    | `/film/foo.m2t` | `out.mkv`        |
///
/// Never fails: odd specs fall through to plain string concatenation.
pub fn resolve_output_path(spec: &str, input: &str) -> String {
    let (spec, root) = match spec.strip_prefix(INPUT_RELATIVE) {
        Some(rest) => (rest, dirname(input)),
        None => (spec, ""),
    };

    let mut dir = dirname(spec).to_string();
    let mut name = basename(spec);
    let mut ext = extension(spec);

    if name.starts_with('.') {
        // ".mkv" is an extension, not a hidden file
        ext = name;
        name = "";
    } else if !dir.ends_with('/') {
        dir.push('/');
    }

    if dir == spec {
        // Bare directory: keep the input's file name
        return join(root, &format!("{}{}", dir, basename(input)));
    }

    if ext.is_empty() {
        // No extension: a directory without trailing slash
        return join(root, &format!("{}/{}", spec, basename(input)));
    }

    if name.is_empty() {
        let mut output = root.to_string();
        if !output.is_empty() && !output.ends_with('/') && !dir.starts_with('/') {
            output.push('/');
        }
        if !dir.is_empty() {
            output.push_str(&dir);
        } else if root.is_empty() {
            output.push_str(dirname(input));
        }
        if !output.is_empty() && !output.ends_with('/') {
            output.push('/');
        }
        output.push_str(stem(basename(input)));
        output.push_str(ext);
        return output;
    }

    spec.to_string()
}

/// Prefixes `path` with `root`, inserting a separator when needed.
fn join(root: &str, path: &str) -> String {
    if root.is_empty() || root.ends_with('/') || path.starts_with('/') {
        format!("{}{}", root, path)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Directory part of a path, without trailing separators unless it is the
/// root itself.
pub(crate) fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => {
            let head = &path[..=idx];
            let trimmed = head.trim_end_matches('/');
            if trimmed.is_empty() {
                head
            } else {
                trimmed
            }
        }
        None => "",
    }
}

/// Final path component; empty when the path ends with a separator.
pub(crate) fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Extension of the final component including the dot, or empty.
///
/// Leading dots of the component do not start an extension, so `.mkv` has
/// none while `foo.mkv` has `.mkv`.
pub(crate) fn extension(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => &name[dot..],
        _ => "",
    }
}

/// File name without its extension.
pub(crate) fn stem(name: &str) -> &str {
    let ext = extension(name);
    &name[..name.len() - ext.len()]
}
