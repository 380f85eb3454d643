//! Parameter metadata, derived from command struct fields by `#[operation]`

use serde::Serialize;

/// JSON type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// Metadata about one command parameter
#[derive(Debug, Clone, Serialize)]
pub struct ParamMeta {
    /// Field name
    pub name: &'static str,
    /// Description (from the field's doc comment)
    pub description: &'static str,
    /// JSON type
    pub param_type: ParamType,
    /// Whether required (non-Option, non-defaulted field)
    pub required: bool,
    /// Alternative input names accepted by the parser
    pub aliases: &'static [&'static str],
}

impl ParamMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            param_type: ParamType::String,
            required: false,
            aliases: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    pub const fn aliases(mut self, a: &'static [&'static str]) -> Self {
        self.aliases = a;
        self
    }

    pub const fn param_type(mut self, t: ParamType) -> Self {
        self.param_type = t;
        self
    }

    /// True if `key` names this parameter directly or through an alias
    pub fn accepts(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }
}
