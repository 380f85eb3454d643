//! Cards and their comments

use super::ids::{BoardId, CardId, CommentId, UserId};
use super::kind::{Entity, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
    pub board: BoardId,
    #[serde(default)]
    pub assignee: Option<UserId>,
    #[serde(default)]
    pub comments: Vec<CommentId>,
}

impl Card {
    pub fn new(board: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            title: title.into(),
            description: String::new(),
            picture: None,
            created_on: Utc::now(),
            due_on: None,
            board: board.into(),
            assignee: None,
            comments: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<UserId>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }
}

impl Entity for Card {
    const KIND: EntityKind = EntityKind::Card;
    type Id = CardId;

    fn id(&self) -> &CardId {
        &self.id
    }
}

/// A comment on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub created_on: DateTime<Utc>,
    pub card: CardId,
    pub created_by: UserId,
}

impl Comment {
    pub fn new(
        card: impl Into<CardId>,
        created_by: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: CommentId::new(),
            content: content.into(),
            created_on: Utc::now(),
            card: card.into(),
            created_by: created_by.into(),
        }
    }
}

impl Entity for Comment {
    const KIND: EntityKind = EntityKind::Comment;
    type Id = CommentId;

    fn id(&self) -> &CommentId {
        &self.id
    }
}
