use super::origin::OriginPattern;
use crate::error::CorsError;
use http::{HeaderName, Method};
use std::time::Duration;

/// A set of header names, or the `*` wildcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderList {
    Any,
    List(Vec<HeaderName>),
}

impl HeaderList {
    fn parse(values: &[String]) -> Result<Self, CorsError> {
        if values.iter().any(|v| v.trim() == "*") {
            return Ok(HeaderList::Any);
        }

        let names = values
            .iter()
            .map(|v| {
                HeaderName::from_bytes(v.trim().as_bytes())
                    .map_err(|_| CorsError::InvalidHeaderName(v.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HeaderList::List(names))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, HeaderList::Any)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, HeaderList::List(names) if names.is_empty())
    }

    /// Header value form: `*` or a comma-separated list
    pub fn to_header_string(&self) -> String {
        match self {
            HeaderList::Any => "*".to_string(),
            HeaderList::List(names) => names
                .iter()
                .map(HeaderName::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// An immutable CORS policy.
///
/// Built once through [`CorsPolicy::builder`] and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin_patterns: Vec<OriginPattern>,
    allow_credentials: bool,
    allowed_headers: HeaderList,
    allowed_methods: Vec<Method>,
    exposed_headers: HeaderList,
    max_age: Duration,
}

impl CorsPolicy {
    pub fn builder() -> CorsPolicyBuilder {
        CorsPolicyBuilder::default()
    }

    pub fn allowed_origin_patterns(&self) -> &[OriginPattern] {
        &self.allowed_origin_patterns
    }

    pub fn allow_credentials(&self) -> bool {
        self.allow_credentials
    }

    pub fn allowed_headers(&self) -> &HeaderList {
        &self.allowed_headers
    }

    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    pub fn exposed_headers(&self) -> &HeaderList {
        &self.exposed_headers
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Whether an `Origin` value is allowed by any pattern
    pub fn check_origin(&self, origin: &str) -> bool {
        self.allowed_origin_patterns.iter().any(|p| p.matches(origin))
    }

    pub fn check_method(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// Returns the headers to echo in `Access-Control-Allow-Headers`, or `None`
    /// if any requested header is not allowed.
    pub fn check_headers<'a>(&self, requested: &[&'a str]) -> Option<Vec<&'a str>> {
        match &self.allowed_headers {
            HeaderList::Any => Some(requested.to_vec()),
            HeaderList::List(allowed) => {
                let all_allowed = requested
                    .iter()
                    .all(|r| allowed.iter().any(|a| a.as_str().eq_ignore_ascii_case(r)));
                all_allowed.then(|| requested.to_vec())
            }
        }
    }

    /// `Access-Control-Allow-Methods` value
    pub fn methods_header_string(&self) -> String {
        self.allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Builder for [`CorsPolicy`]
#[derive(Debug, Clone)]
pub struct CorsPolicyBuilder {
    allowed_origin_patterns: Vec<String>,
    allow_credentials: bool,
    allowed_headers: Vec<String>,
    allowed_methods: Vec<Method>,
    exposed_headers: Vec<String>,
    max_age: Duration,
}

impl Default for CorsPolicyBuilder {
    fn default() -> Self {
        Self {
            allowed_origin_patterns: Vec::new(),
            allow_credentials: false,
            allowed_headers: Vec::new(),
            allowed_methods: vec![Method::GET, Method::HEAD, Method::POST],
            exposed_headers: Vec::new(),
            max_age: Duration::from_secs(1800),
        }
    }
}

impl CorsPolicyBuilder {
    pub fn allowed_origin_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origin_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    pub fn allowed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn allowed_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.allowed_methods = methods.into_iter().collect();
        self
    }

    pub fn exposed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exposed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Compile patterns and check the credentials/wildcard rule
    pub fn build(self) -> Result<CorsPolicy, CorsError> {
        let allowed_origin_patterns = self
            .allowed_origin_patterns
            .iter()
            .map(|p| OriginPattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        if self.allow_credentials && allowed_origin_patterns.iter().any(OriginPattern::is_wildcard) {
            return Err(CorsError::CredentialsWithWildcardOrigin);
        }

        Ok(CorsPolicy {
            allowed_origin_patterns,
            allow_credentials: self.allow_credentials,
            allowed_headers: HeaderList::parse(&self.allowed_headers)?,
            allowed_methods: self.allowed_methods,
            exposed_headers: HeaderList::parse(&self.exposed_headers)?,
            max_age: self.max_age,
        })
    }
}
