//! Parsed operations: a verb, a noun and loose parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operation verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Add,
    Get,
    List,
    Update,
    Delete,
    Move,
    Join,
    Leave,
    Link,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Get => "get",
            Self::List => "list",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Link => "link",
        }
    }

    /// Resolve a verb or one of its aliases (case-insensitive)
    pub fn from_alias(s: &str) -> Option<Self> {
        let verb = match s.to_lowercase().as_str() {
            "add" | "create" | "new" | "insert" | "register" => Self::Add,
            "get" | "show" | "read" | "fetch" | "view" => Self::Get,
            "list" | "ls" | "all" => Self::List,
            "update" | "edit" | "patch" | "set" | "rename" => Self::Update,
            "delete" | "remove" | "rm" | "del" => Self::Delete,
            "move" | "mv" | "reparent" | "reorder" => Self::Move,
            "join" | "add_member" | "invite" => Self::Join,
            "leave" | "remove_member" | "kick" => Self::Leave,
            "link" | "connect" | "oauth" => Self::Link,
            _ => return None,
        };
        Some(verb)
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation nouns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Noun {
    Project,
    Board,
    Card,
    Comment,
    User,
    Activity,
}

impl Noun {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Board => "board",
            Self::Card => "card",
            Self::Comment => "comment",
            Self::User => "user",
            Self::Activity => "activity",
        }
    }

    /// Parse a noun, accepting plurals (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let noun = match s.to_lowercase().as_str() {
            "project" | "projects" => Self::Project,
            "board" | "boards" => Self::Board,
            "card" | "cards" | "task" | "tasks" => Self::Card,
            "comment" | "comments" => Self::Comment,
            "user" | "users" | "member" | "members" => Self::User,
            "activity" | "activities" | "log" => Self::Activity,
            _ => return None,
        };
        Some(noun)
    }
}

impl std::fmt::Display for Noun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a verb/noun pair names a real operation
pub fn is_valid_operation(verb: Verb, noun: Noun) -> bool {
    use Noun::*;
    use Verb::*;

    matches!(
        (verb, noun),
        (Add | Get | List | Update | Delete, Project | Board | Card | Comment | User)
            | (Join | Leave, Project)
            | (Move, Card)
            | (Link, User)
            | (List, Activity)
    )
}

/// A parsed, normalized operation ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub verb: Verb,
    pub noun: Noun,
    pub params: Map<String, Value>,
    pub actor: Option<String>,
}

impl Operation {
    pub fn new(verb: Verb, noun: Noun, params: Map<String, Value>) -> Self {
        Self {
            verb,
            noun,
            params,
            actor: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Canonical "verb noun" string
    pub fn op_string(&self) -> String {
        format!("{} {}", self.verb, self.noun)
    }

    pub fn get_param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}
