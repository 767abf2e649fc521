//! Path Codec
//!
//! Pure translation between client-facing logical paths and storage keys.
//! A logical path is POSIX-style and absolute: it starts with `/`, never
//! ends with `/` except the root itself, and carries no `.`/`..`/empty
//! segments. Storage keys are the same string without the leading slash,
//! with the root mapping to the empty key. No function here performs I/O.

/// Normalizes a raw client-supplied path into canonical logical form.
///
/// Joins the input onto `/`, collapsing empty and `.` segments and
/// resolving `..` against the segment stack (saturating at the root).
/// The result is idempotent: `normalize(normalize(p)) == normalize(p)`.
/// Case is preserved; folding for route matching happens elsewhere.
pub fn normalize(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Converts a normalized logical path into a storage key.
/// The root `/` becomes the empty key; any other path loses its
/// leading slash.
pub fn to_key(path: &str) -> &str {
    if path == "/" {
        ""
    } else {
        path.strip_prefix('/').unwrap_or(path)
    }
}

/// Converts a storage key into the listing prefix for its directory
/// level: the empty key stays empty, everything else gains a trailing
/// slash.
pub fn to_prefix(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        format!("{}/", key)
    }
}

/// Inverse of [`to_key`]: maps the empty key back to the root and
/// re-attaches the leading slash otherwise.
pub fn key_to_path(key: &str) -> String {
    if key.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", key)
    }
}

/// Last segment of a normalized logical path; empty for the root.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Parent directory of a normalized logical path; the root is its own
/// parent.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

/// Joins an entry name onto a normalized directory path.
pub fn child_path(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}
