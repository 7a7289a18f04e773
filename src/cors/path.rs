//! Ant-style path patterns used to scope a policy to part of the URL space.

use crate::error::CorsError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`: zero or more whole segments
    Any,
    /// Literal text with `*` and `?` wildcards
    Glob(String),
}

/// A parsed path pattern such as `/api/**`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, CorsError> {
        if !pattern.starts_with('/') {
            return Err(CorsError::InvalidPathPattern {
                pattern: pattern.to_string(),
                reason: "must start with '/'".to_string(),
            });
        }

        let mut segments = Vec::new();
        for raw in pattern.split('/').filter(|s| !s.is_empty()) {
            if raw == "**" {
                // collapse consecutive `**`
                if segments.last() != Some(&Segment::Any) {
                    segments.push(Segment::Any);
                }
            } else if raw.contains("**") {
                return Err(CorsError::InvalidPathPattern {
                    pattern: pattern.to_string(),
                    reason: "'**' must be a whole path segment".to_string(),
                });
            } else {
                segments.push(Segment::Glob(raw.to_string()));
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Check a request path (without query string)
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Any, rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((Segment::Glob(glob), rest)) => match path.split_first() {
            Some((head, tail)) => glob_match(glob.as_bytes(), head.as_bytes()) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Single-segment glob: `*` any run, `?` one byte
fn glob_match(glob: &[u8], text: &[u8]) -> bool {
    let (mut g, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if g < glob.len() && (glob[g] == b'?' || glob[g] == text[t]) {
            g += 1;
            t += 1;
        } else if g < glob.len() && glob[g] == b'*' {
            backtrack = Some((g, t));
            g += 1;
        } else if let Some((star, matched)) = backtrack {
            g = star + 1;
            t = matched + 1;
            backtrack = Some((star, t));
        } else {
            return false;
        }
    }

    glob[g..].iter().all(|&c| c == b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_star_prefix() {
        let pattern = PathPattern::new("/api/**").unwrap();
        assert!(pattern.matches("/api"));
        assert!(pattern.matches("/api/"));
        assert!(pattern.matches("/api/users"));
        assert!(pattern.matches("/api/users/42/orders"));
        assert!(!pattern.matches("/apix"));
        assert!(!pattern.matches("/health"));
        assert!(!pattern.matches("/"));
    }

    #[test]
    fn test_single_segment_wildcards() {
        let pattern = PathPattern::new("/files/*.txt").unwrap();
        assert!(pattern.matches("/files/readme.txt"));
        assert!(!pattern.matches("/files/a/readme.txt"));
        assert!(!pattern.matches("/files/readme.md"));

        let pattern = PathPattern::new("/v?/items").unwrap();
        assert!(pattern.matches("/v1/items"));
        assert!(!pattern.matches("/v10/items"));
    }

    #[test]
    fn test_double_star_in_middle() {
        let pattern = PathPattern::new("/api/**/edit").unwrap();
        assert!(pattern.matches("/api/edit"));
        assert!(pattern.matches("/api/users/7/edit"));
        assert!(!pattern.matches("/api/users/7"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(PathPattern::new("api/**").is_err());
        assert!(PathPattern::new("/api/a**").is_err());
    }
}
