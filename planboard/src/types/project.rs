//! Projects and boards

use super::ids::{BoardId, CardId, ProjectId, UserId};
use super::kind::{Entity, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project: the root of the ownership tree.
///
/// `boards` mirrors the `project` foreign key of its boards; `users` is the
/// membership list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub boards: Vec<BoardId>,
    #[serde(default)]
    pub users: Vec<UserId>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            created_on: Utc::now(),
            boards: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Start the membership list with `user`
    pub fn with_member(mut self, user: UserId) -> Self {
        if !self.users.contains(&user) {
            self.users.push(user);
        }
        self
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
    type Id = ProjectId;

    fn id(&self) -> &ProjectId {
        &self.id
    }
}

/// A board within a project (or owned directly by a user).
///
/// `cards` is ordered: its order is the display order of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub project: Option<ProjectId>,
    #[serde(default)]
    pub owner: Option<UserId>,
    #[serde(default)]
    pub cards: Vec<CardId>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            project: None,
            owner: None,
            cards: Vec::new(),
        }
    }

    pub fn in_project(mut self, project: impl Into<ProjectId>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn owned_by(mut self, owner: impl Into<UserId>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

impl Entity for Board {
    const KIND: EntityKind = EntityKind::Board;
    type Id = BoardId;

    fn id(&self) -> &BoardId {
        &self.id
    }
}
