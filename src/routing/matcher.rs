//! Path template matching.
//!
//! # Responsibilities
//! - Compile templates such as `/tasks/:id/complete` into segments
//! - Match a request path segment by segment
//! - Extract named parameter values
//!
//! # Design Decisions
//! - Literal segments are case-sensitive
//! - Parameter segments match any non-empty segment
//! - Segment counts must be equal (a trailing slash is significant)
//! - No regex: matching is a single pass over the segments

use std::collections::HashMap;
use std::fmt;

/// Parameters extracted from a matched path, keyed by name.
pub type PathParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template. Segments starting with `:` are named parameters.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = split(&template)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();

        Self { template, segments }
    }

    /// Match `path` (without query string) against this template.
    ///
    /// Returns the extracted parameters, or `None` if the path does not match.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::new();
        let mut actual = split(path);

        for segment in &self.segments {
            let value = actual.next()?;
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if value.is_empty() => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), value.to_string());
                }
            }
        }

        if actual.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn split(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template() {
        let template = PathTemplate::new("/tasks");

        assert_eq!(template.match_path("/tasks"), Some(PathParams::new()));
        assert!(template.match_path("/tasks/").is_none());
        assert!(template.match_path("/Tasks").is_none());
        assert!(template.match_path("/tasks/1").is_none());
        assert!(template.match_path("/").is_none());
    }

    #[test]
    fn test_param_extraction() {
        let template = PathTemplate::new("/tasks/:id/complete");

        let params = template.match_path("/tasks/abc-123/complete").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("abc-123"));

        assert!(template.match_path("/tasks/abc-123").is_none());
        assert!(template.match_path("/tasks//complete").is_none());
        assert!(template.match_path("/tasks/abc/completed").is_none());
    }

    #[test]
    fn test_multiple_params() {
        let template = PathTemplate::new("/lists/:list/items/:item");

        let params = template.match_path("/lists/home/items/42").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["list"], "home");
        assert_eq!(params["item"], "42");
    }

    #[test]
    fn test_display() {
        let template = PathTemplate::new("/tasks/:id");
        assert_eq!(template.to_string(), "/tasks/:id");
        assert_eq!(template.as_str(), "/tasks/:id");
    }
}
