// ABOUTME: Extra response headers injected into every served response.
// ABOUTME: Converts the configured name/value pairs into a validated HeaderMap.

use hyper::HeaderMap;
use hyper::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl SecurityConfig {
    /// Build the header map, rejecting names or values that are not valid HTTP.
    pub fn header_map(&self) -> Result<HeaderMap, String> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| format!("invalid header name: {name:?}"))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| format!("invalid value for header {name}: {value:?}"))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}
