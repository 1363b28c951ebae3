use std::sync::Mutex;

use tracing::info;

/// Query parameter carrying the banner text between pages.
pub const MESSAGE_PARAM: &str = "message";

/// A client-side route plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_message(self, message: &str) -> Self {
        self.with_param(MESSAGE_PARAM, message)
    }

    /// Parse `"/path?a=1&b=2"`. Values are URL-decoded.
    pub fn parse(url: &str) -> Self {
        match url.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect(),
            },
            None => Self::new(url),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The banner text, if the page was reached with one.
    pub fn message(&self) -> Option<&str> {
        self.param(MESSAGE_PARAM).filter(|m| !m.is_empty())
    }

    /// Path with the URL-encoded query appended.
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_url())
    }
}

/// Moves the user to another page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Location);
}

/// Navigator that keeps every destination in order. The CLI prints the last
/// one; tests assert on the whole history.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Location>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Location> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Location> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: Location) {
        info!("Navigating to {}", to);
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_url_encoded() {
        let loc = Location::new("/templates/login.html").with_message("a b\nc&d");
        assert_eq!(loc.to_url(), "/templates/login.html?message=a+b%0Ac%26d");
    }

    #[test]
    fn parse_decodes_message() {
        let loc = Location::parse("/templates/login.html?message=a+b%0Ac%26d&x=1");
        assert_eq!(loc.path, "/templates/login.html");
        assert_eq!(loc.message(), Some("a b\nc&d"));
        assert_eq!(loc.param("x"), Some("1"));
    }

    #[test]
    fn path_without_query_round_trips() {
        let loc = Location::parse("/templates/images.html");
        assert!(loc.query.is_empty());
        assert_eq!(loc.to_url(), "/templates/images.html");
    }

    #[test]
    fn empty_message_is_ignored() {
        let loc = Location::parse("/p?message=");
        assert!(loc.message().is_none());
    }

    #[test]
    fn recorder_keeps_order() {
        let nav = RecordingNavigator::new();
        nav.navigate(Location::new("/a"));
        nav.navigate(Location::new("/b"));
        let paths: Vec<_> = nav.history().into_iter().map(|l| l.path).collect();
        assert_eq!(paths, vec!["/a", "/b"]);
        assert_eq!(nav.last().unwrap().path, "/b");
    }
}
