//! Cascading deletes
//!
//! Every step is a separate store call, awaited before the next. A failing
//! step stops the cascade and returns its error; deletions already made stay
//! made. Only the immediate parent's child-id list is cleaned; everything
//! below the root is found through the children's foreign keys.

use super::BackReferences;
use crate::error::Result;
use crate::relation::{BOARD_CARDS, CARD_COMMENTS, PROJECT_BOARDS, PROJECT_MEMBERS};
use crate::store::{document_id, Document, EntityStore, Filter, Patch};
use crate::types::{BoardId, CardId, CommentId, EntityKind, ProjectId, UserId};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The root of a cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootRef {
    Project(ProjectId),
    Board(BoardId),
    Card(CardId),
    Comment(CommentId),
    User(UserId),
}

impl RootRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Project,
            Self::Board(_) => EntityKind::Board,
            Self::Card(_) => EntityKind::Card,
            Self::Comment(_) => EntityKind::Comment,
            Self::User(_) => EntityKind::User,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Project(id) => id.as_str(),
            Self::Board(id) => id.as_str(),
            Self::Card(id) => id.as_str(),
            Self::Comment(id) => id.as_str(),
            Self::User(id) => id.as_str(),
        }
    }
}

/// Number of dependent records removed, the root included when it is of
/// that kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeCounts {
    pub boards: u64,
    pub cards: u64,
    pub comments: u64,
}

/// Outcome of a completed cascade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeReport {
    pub deleted_root: Document,
    pub counts: CascadeCounts,
    /// Cards whose assignee was cleared (user deletion)
    #[serde(skip_serializing_if = "is_zero")]
    pub unassigned_cards: u64,
    /// Projects the user was removed from (user deletion)
    #[serde(skip_serializing_if = "is_zero")]
    pub memberships_removed: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl CascadeReport {
    fn new(deleted_root: Document, counts: CascadeCounts) -> Self {
        Self {
            deleted_root,
            counts,
            unassigned_cards: 0,
            memberships_removed: 0,
        }
    }
}

/// Executes cascading deletes against a store
pub struct Cascade<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> Cascade<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    fn refs(&self) -> BackReferences<'a> {
        BackReferences::new(self.store)
    }

    /// Delete `root` and everything that depends on it
    pub async fn delete_root_and_cascade(&self, root: &RootRef) -> Result<CascadeReport> {
        let report = match root {
            RootRef::Project(id) => self.delete_project(id).await,
            RootRef::Board(id) => self.delete_board(id).await,
            RootRef::Card(id) => self.delete_card(id).await,
            RootRef::Comment(id) => self.delete_comment(id).await,
            RootRef::User(id) => self.delete_user(id).await,
        }?;
        info!(
            kind = %root.kind(),
            id = root.id(),
            boards = report.counts.boards,
            cards = report.counts.cards,
            comments = report.counts.comments,
            "cascade complete"
        );
        Ok(report)
    }

    /// Delete a project, then its boards' comments, cards and boards.
    ///
    /// The project record goes first and marks the operation; if it is
    /// missing nothing else is touched.
    pub async fn delete_project(&self, id: &ProjectId) -> Result<CascadeReport> {
        let project = self.store.delete_by_id(EntityKind::Project, id.as_str()).await?;
        debug!(project = %id, "deleted project record");

        let by_project = Filter::all().eq("project", id.as_str());
        let board_ids = ids_of(&self.store.find(EntityKind::Board, &by_project).await?);
        let by_board = Filter::all().is_in("board", board_ids.iter().cloned());
        let card_ids = ids_of(&self.store.find(EntityKind::Card, &by_board).await?);
        debug!(project = %id, boards = board_ids.len(), cards = card_ids.len(), "collected closure");

        let comments = self
            .store
            .delete_many(EntityKind::Comment, &Filter::all().is_in("card", card_ids))
            .await?;
        let cards = self.store.delete_many(EntityKind::Card, &by_board).await?;
        let boards = self.store.delete_many(EntityKind::Board, &by_project).await?;

        Ok(CascadeReport::new(
            project,
            CascadeCounts {
                boards,
                cards,
                comments,
            },
        ))
    }

    /// Delete a board with its cards and their comments, then detach it from
    /// its project. A missing board fails before any write.
    pub async fn delete_board(&self, id: &BoardId) -> Result<CascadeReport> {
        self.store.get(EntityKind::Board, id.as_str()).await?;

        let by_board = Filter::all().eq("board", id.as_str());
        let card_ids = ids_of(&self.store.find(EntityKind::Card, &by_board).await?);
        let comments = self
            .store
            .delete_many(EntityKind::Comment, &Filter::all().is_in("card", card_ids))
            .await?;
        let cards = self.store.delete_many(EntityKind::Card, &by_board).await?;
        let board = self.store.delete_by_id(EntityKind::Board, id.as_str()).await?;
        debug!(board = %id, cards, comments, "deleted board and contents");

        if let Some(project) = string_field(&board, "project") {
            self.refs()
                .detach_child(&PROJECT_BOARDS, &project, id.as_str())
                .await?;
        }

        Ok(CascadeReport::new(
            board,
            CascadeCounts {
                boards: 1,
                cards,
                comments,
            },
        ))
    }

    /// Delete a card and its comments, then detach it from its board
    pub async fn delete_card(&self, id: &CardId) -> Result<CascadeReport> {
        self.store.get(EntityKind::Card, id.as_str()).await?;

        let comments = self
            .store
            .delete_many(EntityKind::Comment, &Filter::all().eq("card", id.as_str()))
            .await?;
        let card = self.store.delete_by_id(EntityKind::Card, id.as_str()).await?;
        debug!(card = %id, comments, "deleted card and comments");

        if let Some(board) = string_field(&card, "board") {
            self.refs()
                .detach_child(&BOARD_CARDS, &board, id.as_str())
                .await?;
        }

        Ok(CascadeReport::new(
            card,
            CascadeCounts {
                boards: 0,
                cards: 1,
                comments,
            },
        ))
    }

    /// Delete a comment and detach it from its card
    pub async fn delete_comment(&self, id: &CommentId) -> Result<CascadeReport> {
        let comment = self.store.delete_by_id(EntityKind::Comment, id.as_str()).await?;
        if let Some(card) = string_field(&comment, "card") {
            self.refs()
                .detach_child(&CARD_COMMENTS, &card, id.as_str())
                .await?;
        }

        Ok(CascadeReport::new(
            comment,
            CascadeCounts {
                boards: 0,
                cards: 0,
                comments: 1,
            },
        ))
    }

    /// Delete a user along with everything they own.
    ///
    /// Comments they wrote are removed (and detached from their cards), boards
    /// they own are removed with their cards and comments, surviving cards
    /// assigned to them are unassigned and they leave every project. The user
    /// record goes last.
    pub async fn delete_user(&self, id: &UserId) -> Result<CascadeReport> {
        self.store.get(EntityKind::User, id.as_str()).await?;
        let refs = self.refs();

        // comments they authored
        let by_author = Filter::all().eq("created_by", id.as_str());
        let authored = self.store.find(EntityKind::Comment, &by_author).await?;
        let mut comments = self.store.delete_many(EntityKind::Comment, &by_author).await?;
        for (card, comment_ids) in group_by_field(&authored, "card") {
            let comment_ids: Vec<&str> = comment_ids.iter().map(String::as_str).collect();
            refs.detach_children(&CARD_COMMENTS, &card, &comment_ids)
                .await?;
        }

        // boards they own, with their contents
        let by_owner = Filter::all().eq("owner", id.as_str());
        let boards_owned = self.store.find(EntityKind::Board, &by_owner).await?;
        let board_ids = ids_of(&boards_owned);
        let by_board = Filter::all().is_in("board", board_ids.iter().cloned());
        let card_ids = ids_of(&self.store.find(EntityKind::Card, &by_board).await?);
        comments += self
            .store
            .delete_many(EntityKind::Comment, &Filter::all().is_in("card", card_ids))
            .await?;
        let cards = self.store.delete_many(EntityKind::Card, &by_board).await?;
        let boards = self.store.delete_many(EntityKind::Board, &by_owner).await?;
        for (project, board_ids) in group_by_field(&boards_owned, "project") {
            let board_ids: Vec<&str> = board_ids.iter().map(String::as_str).collect();
            refs.detach_children(&PROJECT_BOARDS, &project, &board_ids)
                .await?;
        }
        debug!(user = %id, boards, cards, comments, "deleted user's content");

        // surviving cards assigned to them
        let assigned = ids_of(
            &self
                .store
                .find(EntityKind::Card, &Filter::all().eq("assignee", id.as_str()))
                .await?,
        );
        for card in &assigned {
            self.store
                .update_by_id(EntityKind::Card, card, &Patch::new().unset("assignee"))
                .await?;
        }

        // memberships
        let projects = ids_of(
            &self
                .store
                .find(
                    EntityKind::Project,
                    &Filter::all().contains(PROJECT_MEMBERS.list_field, id.as_str()),
                )
                .await?,
        );
        for project in &projects {
            refs.detach_child(&PROJECT_MEMBERS, project, id.as_str())
                .await?;
        }

        let user = self.store.delete_by_id(EntityKind::User, id.as_str()).await?;

        let mut report = CascadeReport::new(
            user,
            CascadeCounts {
                boards,
                cards,
                comments,
            },
        );
        report.unassigned_cards = assigned.len() as u64;
        report.memberships_removed = projects.len() as u64;
        Ok(report)
    }
}

fn ids_of(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .filter_map(document_id)
        .map(str::to_string)
        .collect()
}

fn string_field(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Group record ids by the value of a string field, skipping records without it
fn group_by_field(docs: &[Document], field: &str) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for doc in docs {
        if let (Some(key), Some(id)) = (string_field(doc, field), document_id(doc)) {
            groups.entry(key).or_default().push(id.to_string());
        }
    }
    groups
}
