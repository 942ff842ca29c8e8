//! Path helpers shared by the downloader.

use reqwest::Url;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Replace spaces and colons with underscores in every normal component of a
/// directory path.
///
/// Root and prefix components are kept as they are, so absolute paths stay
/// absolute (and Windows drive letters keep their colon).
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use downloadmanager::utils::sanitize_dir;
///
/// assert_eq!(
///     sanitize_dir(Path::new("/tmp/my models/v1:latest")),
///     PathBuf::from("/tmp/my_models/v1_latest")
/// );
/// ```
pub fn sanitize_dir(path: &Path) -> PathBuf {
    path.components()
        .map(|component| match component {
            Component::Normal(name) => sanitize_component(name.to_os_string()),
            other => other.as_os_str().to_os_string(),
        })
        .collect()
}

fn sanitize_component(name: OsString) -> OsString {
    match name.to_str() {
        Some(s) if s.contains(is_hostile) => s.replace(is_hostile, "_").into(),
        _ => name,
    }
}

fn is_hostile(c: char) -> bool {
    c == ' ' || c == ':'
}

/// Derive the file name a URL should be stored under.
///
/// The basename of the URL path is used, percent-decoded. Query strings,
/// fragments and forced fetcher prefixes such as `git::` are ignored. Shorthand
/// sources that are not absolute URLs (`github.com/owner/repo`) fall back to
/// the last `/` separated segment.
///
/// Returns `None` when the path has no basename, e.g. `http://host/dir/`, or
/// when the decoded basename contains a path separator.
///
/// ```rust
/// use downloadmanager::utils::file_name_from_url;
///
/// assert_eq!(file_name_from_url("http://host/path/to/file.json").as_deref(), Some("file.json"));
/// assert_eq!(file_name_from_url("https://host/a%20b.zip?token=1").as_deref(), Some("a b.zip"));
/// assert_eq!(file_name_from_url("http://host/dir/"), None);
/// ```
pub fn file_name_from_url(url: &str) -> Option<String> {
    let (_, source) = split_forced(url);
    let path = match Url::parse(source) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => source
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let name = path.rsplit('/').next().unwrap_or_default();
    let name = urlencoding::decode(name)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| name.to_string());

    let usable = !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\']);
    usable.then_some(name)
}

/// Split a `forced::rest` source into its forced fetcher and the rest.
///
/// Only a purely alphanumeric prefix counts as forced, so `C::` style strings
/// inside paths or URLs are left alone.
pub(crate) fn split_forced(source: &str) -> (Option<&str>, &str) {
    match source.split_once("::") {
        Some((forced, rest))
            if !forced.is_empty() && forced.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (Some(forced), rest)
        }
        _ => (None, source),
    }
}
