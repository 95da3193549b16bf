//! Translation of explanation and sort-label messages.
//!
//! Messages are keyed by their English text. Positional placeholders
//! `{0}`, `{1}`, ... are substituted after lookup.

use std::collections::HashMap;

use crate::error::Result;

/// Renders a message template for a locale.
pub trait Translator: Send + Sync {
    /// Translate `template` into `locale` and substitute `args`.
    ///
    /// # Errors
    ///
    /// Implementations backed by external catalogues may fail; the error is
    /// fatal to the search call.
    fn translate(&self, template: &str, locale: &str, args: &[&str]) -> Result<String>;
}

/// In-memory message catalogue falling back to the English template.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    /// locale → English template → translated template.
    messages: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    /// An empty catalogue: every message renders in English.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalogue from nested locale → message maps.
    pub fn from_messages(messages: HashMap<String, HashMap<String, String>>) -> Self {
        Self { messages }
    }

    /// Add one translated message.
    #[must_use]
    pub fn with_message(mut self, locale: &str, template: &str, translated: &str) -> Self {
        self.messages
            .entry(locale.to_string())
            .or_default()
            .insert(template.to_string(), translated.to_string());
        self
    }

    fn lookup<'a>(&'a self, template: &'a str, locale: &str) -> &'a str {
        self.messages
            .get(locale)
            .and_then(|m| m.get(template))
            .map_or(template, String::as_str)
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, template: &str, locale: &str, args: &[&str]) -> Result<String> {
        Ok(substitute(self.lookup(template, locale), args))
    }
}

/// Replace `{n}` placeholders with `args[n]` in one pass.
///
/// Placeholders without a matching argument are left as written, and
/// substituted text is never expanded again.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after.find('}').and_then(|close| {
            after[..close]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map(|value| (close, *value))
        });
        match arg {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_passthrough() {
        let catalog = MessageCatalog::new();
        let text = catalog
            .translate("Animals matching '{0}'.", "en", &["rex"])
            .unwrap();
        assert_eq!(text, "Animals matching 'rex'.");
    }

    #[test]
    fn translated_message_used_for_its_locale_only() {
        let catalog = MessageCatalog::new().with_message(
            "fr",
            "Most relevant",
            "Les plus pertinents",
        );
        assert_eq!(
            catalog.translate("Most relevant", "fr", &[]).unwrap(),
            "Les plus pertinents"
        );
        assert_eq!(
            catalog.translate("Most relevant", "de", &[]).unwrap(),
            "Most relevant"
        );
    }

    #[test]
    fn substitute_multiple_and_missing_args() {
        assert_eq!(substitute("{0} and {1}", &["a", "b"]), "a and b");
        assert_eq!(substitute("{0} and {1}", &["a"]), "a and {1}");
        assert_eq!(substitute("no placeholders", &["x"]), "no placeholders");
    }

    #[test]
    fn substituted_args_are_not_reexpanded() {
        assert_eq!(substitute("{0}|{1}", &["{1}", "b"]), "{1}|b");
        assert_eq!(substitute("{} {x}", &["a"]), "{} {x}");
    }
}
