use super::*;
use paf_core::DEFAULT_PORT;
use serde::Serialize;

/// Type a setting is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    String,
    Integer,
}

/// One declared setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub key: &'static str,
    pub kind: SettingKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Setting>,
}

impl Rule {
    fn string(key: &'static str, required: bool) -> Self {
        Self {
            key,
            kind: SettingKind::String,
            required,
            default: None,
        }
    }
    fn integer(key: &'static str, required: bool) -> Self {
        Self {
            key,
            kind: SettingKind::Integer,
            required,
            default: None,
        }
    }
    fn or(mut self, default: Setting) -> Self {
        self.default = Some(default);
        self
    }
}

/// Settings the publisher declares to the collection framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    pub rules: Vec<Rule>,
}

impl Policy {
    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.key == key)
    }
    /// Copy of `bundle` with declared defaults filled in for absent keys.
    pub fn apply(&self, bundle: &Bundle) -> Bundle {
        let mut bundle = bundle.clone();
        for rule in self.rules.iter() {
            if let Some(ref default) = rule.default {
                if bundle.get(rule.key).is_none() {
                    bundle.insert(rule.key, default.clone());
                }
            }
        }
        bundle
    }
}

impl Default for Policy {
    #[rustfmt::skip]
    fn default() -> Self {
        Self {
            rules: vec![
                Rule::string(keys::HOST,       true),
                Rule::integer(keys::PORT,      false).or(Setting::Int(DEFAULT_PORT as i64)),
                Rule::string(keys::DATABASE,   true),
                Rule::string(keys::USER,       true),
                Rule::string(keys::PASSWORD,   true),
                Rule::integer(keys::TEST_RUN,  true),
                Rule::string(keys::LOG_LEVEL,  false),
                Rule::string(keys::STRICTNESS, false),
            ],
        }
    }
}
