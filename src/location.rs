//! Launch location: a path plus query parameters
//!
//! The client is started with an optional URL (`streamx://app/?page=2`,
//! `streamx://app/success?token=..&email=..`, or just `?page=2`). Pagination
//! writes back into it so the position survives a restart.

use url::form_urlencoded;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    params: Vec<(String, String)>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            params: Vec::new(),
        }
    }
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            params: Vec::new(),
        }
    }

    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::default();
        }

        if let Ok(url) = Url::parse(input) {
            if url.has_host() || url.scheme() == "streamx" {
                return Self {
                    path: normalize_path(url.path()),
                    params: url.query_pairs().into_owned().collect(),
                };
            }
        }

        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, query),
            None if input.contains('=') => ("", input),
            None => (input, ""),
        };
        let query = query.split('#').next().unwrap_or("");

        Self {
            path: normalize_path(path),
            params: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty value of `key`
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.params {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }

    /// Path plus `?query` when there is one
    pub fn to_relative_url(&self) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
