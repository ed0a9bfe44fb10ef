use std::fmt;
use url::Url;

/// A path of segments below the configured root URL
///
/// Only the navigator mutates a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    root: Url,
    segments: Vec<String>,
}

impl Location {
    pub fn new(root: Url) -> Self {
        Self {
            root,
            segments: Vec::new(),
        }
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Full URL of this location
    pub fn url(&self) -> Url {
        join_segments(&self.root, &self.segments)
    }

    /// URL of a child of this location
    pub fn child_url(&self, id: &str) -> Url {
        let mut url = self.url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    pub(crate) fn push(&mut self, segment: String) {
        self.segments.push(segment);
    }

    /// Drops up to `steps` trailing segments, never going above the root
    pub(crate) fn pop(&mut self, steps: usize) {
        let keep = self.segments.len().saturating_sub(steps);
        self.segments.truncate(keep);
    }

    pub(crate) fn clear(&mut self) {
        self.segments.clear();
    }

    pub(crate) fn replace(&mut self, segments: Vec<String>) {
        self.segments = segments;
    }

    /// Splits a path into segments relative to `root`
    ///
    /// Accepts either a full URL below the root or a path relative to it
    /// (`vrm/synt/statfin_synt_pxt_001.px`). Segments are percent-decoded so
    /// they are encoded exactly once when the URL is rebuilt. Returns `None`
    /// for a full URL outside the root, and for `.`, `..` or empty segments
    /// inside the path.
    pub fn parse_path(root: &Url, path: &str) -> Option<Vec<String>> {
        let raw: Vec<String> = match Url::parse(path) {
            Ok(url) => {
                if url.origin() != root.origin() {
                    return None;
                }
                let base = path_of(root);
                let full = path_of(&url);
                if full.len() < base.len() || full[..base.len()] != base[..] {
                    return None;
                }
                full[base.len()..].to_vec()
            }
            Err(_) => match path.trim_matches('/') {
                "" => Vec::new(),
                trimmed => trimmed.split('/').map(str::to_string).collect(),
            },
        };

        raw.iter().map(String::as_str).map(decode_segment).collect()
    }
}

/// Path segments of a URL, ignoring a trailing slash
fn path_of(url: &Url) -> Vec<String> {
    let mut segments: Vec<String> = url
        .path_segments()
        .map(|segments| segments.map(str::to_string).collect())
        .unwrap_or_default();
    if segments.last().is_some_and(|last| last.is_empty()) {
        segments.pop();
    }
    segments
}

fn decode_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment).ok()?;
    match decoded.as_ref() {
        "" | "." | ".." => None,
        _ => Some(decoded.into_owned()),
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

fn join_segments(root: &Url, extra: &[String]) -> Url {
    let mut url = root.clone();
    if !extra.is_empty() {
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(extra);
        }
    }
    url
}
