//! Provider query assembly.
//!
//! A [`QuerySpec`] is a pure value: endpoint function identifier plus an
//! ordered parameter list, built fresh per call and never mutated after
//! construction. URL assembly is deterministic string concatenation with no
//! validation; malformed input yields a malformed URL that surfaces later as
//! a transport or parse failure.

/// A provider query: function identifier plus ordered parameters.
#[derive(Clone, Debug)]
pub struct QuerySpec {
    function: &'static str,
    params: Vec<(&'static str, String)>,
}

impl QuerySpec {
    /// Start a query for the given endpoint function.
    pub fn new(function: &'static str) -> Self {
        Self {
            function,
            params: Vec::new(),
        }
    }

    /// Append a parameter. Order is preserved in the final URL.
    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Endpoint function identifier.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Assemble the request URL. The credential is always appended last.
    pub fn to_url(&self, base: &str, api_key: &str) -> String {
        let mut url = String::with_capacity(base.len() + 64);
        url.push_str(base);
        url.push_str("?function=");
        url.push_str(self.function);
        for (key, value) in &self.params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url.push_str("&apikey=");
        url.push_str(api_key);
        url
    }
}
