use regex::Regex;
use std::collections::HashMap;

use crate::error::RouteError;

/// A path pattern such as `/users/{id}/posts/{post}`, compiled once.
///
/// Each `{name}` captures one or more characters other than `/`; everything
/// else must match literally, and the whole path has to match.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl PathTemplate {
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        let (pattern, param_names) = template_to_pattern(template);
        let regex = Regex::new(&pattern).map_err(|source| RouteError::InvalidTemplate {
            template: template.to_string(),
            source,
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Captured parameters if `path` matches end to end.
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Converts the template into an anchored regex and the ordered capture names.
fn template_to_pattern(template: &str) -> (String, Vec<String>) {
    let mut pattern = String::with_capacity(template.len() + 16);
    pattern.push('^');
    let mut param_names = Vec::new();

    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        let name = &rest[open + 1..close];

        pattern.push_str(&regex::escape(&rest[..open]));
        if is_param_name(name) {
            pattern.push_str(&format!("(?P<{name}>[^/]+)"));
            param_names.push(name.to_string());
        } else {
            // not a placeholder, keep the braces literally
            pattern.push_str(&regex::escape(&rest[open..=close]));
        }
        rest = &rest[close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    (pattern, param_names)
}
