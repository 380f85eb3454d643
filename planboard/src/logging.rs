//! Log formatting helpers

use serde::Serialize;
use std::fmt::{self, Debug};

/// Renders a value as YAML on the lines after the log message.
///
/// ```ignore
/// use planboard::Pretty;
/// tracing::debug!("cascade report: {}", Pretty(&report));
/// ```
///
/// Falls back to `{:#?}` if the value does not serialize.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> Pretty<T> {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{yaml}"),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl<T: Serialize + Debug> fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::CascadeCounts;

    #[test]
    fn test_pretty_renders_yaml() {
        let counts = CascadeCounts {
            boards: 2,
            cards: 6,
            comments: 12,
        };
        let rendered = Pretty(&counts).to_string();
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("boards: 2"));
        assert!(rendered.contains("comments: 12"));
    }
}
