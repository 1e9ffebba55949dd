//! Unit key derivation from request paths.

/// Collapses empty segments and trims surrounding slashes.
pub(crate) fn normalise(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Derives the unit key for `path`.
///
/// When `base_path` is a segment-wise prefix of the path, the remainder keeps
/// its directories: `/api/v1/admin.php` under `/api` gives `v1/admin`.
/// Otherwise only the basename is used. Extensions are dropped in both cases.
pub(crate) fn unit_key(path: &str, base_path: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = segments(path).collect();
    let relative = base_path.and_then(|base| {
        let prefix: Vec<&str> = segments(base).collect();
        parts.strip_prefix(prefix.as_slice())
    });

    match relative {
        Some(rest) => {
            let (file, directories) = rest.split_last()?;
            let mut key: Vec<&str> = directories.to_vec();
            key.push(stem(file));
            Some(key.join("/"))
        }
        None => parts.last().map(|file| stem(file).to_owned()),
    }
}

fn stem(file: &str) -> &str {
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    }
}
