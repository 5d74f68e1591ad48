//! Cache key naming for client, token and user records.

use serde::{Deserialize, Serialize};

pub const KEY_PLACEHOLDER: &str = "%s";

pub const CLIENT_KEY_TEMPLATE: &str = "clients:%s";
pub const TOKEN_KEY_TEMPLATE: &str = "tokens:%s";
pub const USER_KEY_TEMPLATE: &str = "users:%s";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyCategory {
    Client,
    Token,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyTemplates {
    pub client: String,
    pub token: String,
    pub user: String,
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self {
            client: CLIENT_KEY_TEMPLATE.to_string(),
            token: TOKEN_KEY_TEMPLATE.to_string(),
            user: USER_KEY_TEMPLATE.to_string(),
        }
    }
}

impl KeyTemplates {
    #[must_use]
    pub fn template(&self, category: KeyCategory) -> &str {
        match category {
            KeyCategory::Client => &self.client,
            KeyCategory::Token => &self.token,
            KeyCategory::User => &self.user,
        }
    }

    /// Categories whose template has no placeholder.
    #[must_use]
    pub fn missing_placeholders(&self) -> Vec<KeyCategory> {
        [KeyCategory::Client, KeyCategory::Token, KeyCategory::User]
            .into_iter()
            .filter(|c| !self.template(*c).contains(KEY_PLACEHOLDER))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyNamer {
    templates: KeyTemplates,
}

impl KeyNamer {
    #[must_use]
    pub const fn new(templates: KeyTemplates) -> Self {
        Self { templates }
    }

    #[must_use]
    pub fn key(&self, category: KeyCategory, id: &str) -> String {
        self.templates
            .template(category)
            .replacen(KEY_PLACEHOLDER, id, 1)
    }

    #[must_use]
    pub fn client_key(&self, client_id: &str) -> String {
        self.key(KeyCategory::Client, client_id)
    }

    #[must_use]
    pub fn token_key(&self, token_id: &str) -> String {
        self.key(KeyCategory::Token, token_id)
    }

    #[must_use]
    pub fn user_key(&self, user_id: &str) -> String {
        self.key(KeyCategory::User, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates() {
        let namer = KeyNamer::default();
        assert_eq!(namer.client_key("abc"), "clients:abc");
        assert_eq!(namer.token_key("t-1"), "tokens:t-1");
        assert_eq!(namer.user_key("42"), "users:42");
    }

    #[test]
    fn test_custom_template() {
        let namer = KeyNamer::new(KeyTemplates {
            client: "tvhub:%s:client".to_string(),
            ..KeyTemplates::default()
        });
        assert_eq!(namer.key(KeyCategory::Client, "x"), "tvhub:x:client");
        assert_eq!(namer.key(KeyCategory::User, "x"), "users:x");
    }

    #[test]
    fn test_identifier_with_placeholder_is_not_expanded() {
        let namer = KeyNamer::default();
        assert_eq!(namer.token_key("%s"), "tokens:%s");
    }

    #[test]
    fn test_missing_placeholders() {
        let templates = KeyTemplates {
            token: "tokens".to_string(),
            ..KeyTemplates::default()
        };
        assert_eq!(templates.missing_placeholders(), vec![KeyCategory::Token]);
        assert!(KeyTemplates::default().missing_placeholders().is_empty());
    }
}
