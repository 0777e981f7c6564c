//! CSS custom-property table backing the `ThemeSink` port.
//!
//! The mirror has no document tree of its own, so the root element's style
//! properties are modeled as a shared name->value table the UI layer reads
//! when rendering. `accent` intentionally maps to `--tertiary`: that is the
//! variable name the stylesheets use.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::modules::content::application::ports::outgoing::theme_sink::ThemeSink;
use crate::modules::content::domain::entities::Theme;

pub const VAR_PRIMARY: &str = "--primary";
pub const VAR_SECONDARY: &str = "--secondary";
pub const VAR_TERTIARY: &str = "--tertiary";

#[derive(Debug, Default)]
pub struct CssVariableSink {
    variables: RwLock<BTreeMap<&'static str, String>>,
}

impl CssVariableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.variables
            .read()
            .ok()
            .and_then(|vars| vars.get(name).cloned())
    }
}

impl ThemeSink for CssVariableSink {
    fn apply(&self, theme: &Theme) {
        if let Ok(mut vars) = self.variables.write() {
            vars.insert(VAR_PRIMARY, theme.primary.clone());
            vars.insert(VAR_SECONDARY, theme.secondary.clone());
            vars.insert(VAR_TERTIARY, theme.accent.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_all_three_variables() {
        let sink = CssVariableSink::new();
        sink.apply(&Theme {
            primary: "#FF0000".to_string(),
            secondary: "#00FF00".to_string(),
            accent: "#0000FF".to_string(),
        });

        assert_eq!(sink.get(VAR_PRIMARY), Some("#FF0000".to_string()));
        assert_eq!(sink.get(VAR_SECONDARY), Some("#00FF00".to_string()));
        assert_eq!(sink.get(VAR_TERTIARY), Some("#0000FF".to_string()));
    }

    #[test]
    fn test_reapply_overwrites() {
        let sink = CssVariableSink::new();
        sink.apply(&Theme {
            primary: "#111111".to_string(),
            secondary: "#222222".to_string(),
            accent: "#333333".to_string(),
        });
        sink.apply(&Theme {
            primary: "#444444".to_string(),
            secondary: "#555555".to_string(),
            accent: "#666666".to_string(),
        });

        assert_eq!(sink.get(VAR_PRIMARY), Some("#444444".to_string()));
    }
}
