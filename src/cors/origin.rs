//! Glob-style origin patterns.
//!
//! A pattern is either the bare wildcard `*`, or a scheme+host string where
//! `*` matches any run of characters. The port may be given as a bracketed
//! list at the end: `http://localhost:[*]` accepts any port (or none), and
//! `http://localhost:[3000,5173]` accepts only those ports (or none). A
//! trailing `:*` is shorthand for `:[*]`.

use crate::error::CorsError;
use regex::Regex;
use std::fmt;

/// A compiled origin pattern
#[derive(Debug, Clone)]
pub struct OriginPattern {
    source: String,
    regex: Option<Regex>,
}

impl OriginPattern {
    /// Compile an origin pattern
    pub fn new(pattern: &str) -> Result<Self, CorsError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(invalid(pattern, "pattern is empty"));
        }

        if trimmed == "*" {
            return Ok(Self {
                source: trimmed.to_string(),
                regex: None,
            });
        }

        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let (base, ports) = split_ports(pattern, trimmed)?;

        let mut expr = String::from("(?i)^");
        expr.push_str(
            &base
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*"),
        );
        match ports {
            PortSpec::Unspecified => {}
            PortSpec::Any => expr.push_str(r"(:\d+)?"),
            PortSpec::List(list) => {
                expr.push_str("(:(");
                expr.push_str(&list.join("|"));
                expr.push_str("))?");
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| invalid(pattern, &e.to_string()))?;

        Ok(Self {
            source: trimmed.to_string(),
            regex: Some(regex),
        })
    }

    /// Whether this is the bare `*` wildcard
    pub fn is_wildcard(&self) -> bool {
        self.regex.is_none()
    }

    /// Check an `Origin` header value against the pattern
    pub fn matches(&self, origin: &str) -> bool {
        let origin = origin.strip_suffix('/').unwrap_or(origin);
        match &self.regex {
            None => true,
            Some(regex) => regex.is_match(origin),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for OriginPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

enum PortSpec {
    Unspecified,
    Any,
    List(Vec<String>),
}

fn split_ports<'a>(original: &str, pattern: &'a str) -> Result<(&'a str, PortSpec), CorsError> {
    if let Some(base) = pattern.strip_suffix(":*") {
        return Ok((base, PortSpec::Any));
    }

    let Some(without_bracket) = pattern.strip_suffix(']') else {
        return Ok((pattern, PortSpec::Unspecified));
    };
    let Some((base, list)) = without_bracket.rsplit_once(":[") else {
        return Err(invalid(original, "unbalanced port list"));
    };

    if list == "*" {
        return Ok((base, PortSpec::Any));
    }

    let ports: Vec<String> = list.split(',').map(|p| p.trim().to_string()).collect();
    if ports
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid(original, "port list must be '*' or comma-separated numbers"));
    }

    Ok((base, PortSpec::List(ports)))
}

fn invalid(pattern: &str, reason: &str) -> CorsError {
    CorsError::InvalidOriginPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
