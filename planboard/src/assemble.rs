//! Read-side assembly of nested views
//!
//! The integrity core never expands relations. Readers that want a project
//! with its boards, cards and comments ask the [`Assembler`], which performs
//! one explicit lookup per level. Children are always discovered through
//! their foreign key, so a stale parent list cannot hide or invent a child;
//! the list only decides the order.

use crate::error::Result;
use crate::store::{Collection, EntityStore, Filter};
use crate::types::{
    Board, BoardId, Card, CardId, Comment, CommentId, Entity, EntityId, Project, ProjectId, User,
    UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How far to expand, counted from the project level down.
///
/// Depth is absolute: asking for `Cards` on a board expands its cards, asking
/// for `Boards` on a board expands nothing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    #[default]
    Root,
    Boards,
    Cards,
    Comments,
    Authors,
}

/// Public fields of a comment's author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSummary {
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            picture: user.picture.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boards: Option<Vec<BoardView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub board: Board,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    /// `None` when authors were not requested or the author no longer exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummary>,
}

/// Builds nested views with sequential store reads
pub struct Assembler<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> Assembler<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    pub async fn project(&self, id: &ProjectId, depth: Depth) -> Result<ProjectView> {
        let project: Project = Collection::new(self.store).get(id).await?;
        let boards = if depth >= Depth::Boards {
            let boards: Vec<Board> = self.children("project", id.as_str(), &project.boards).await?;
            let mut views = Vec::with_capacity(boards.len());
            for board in boards {
                views.push(self.expand_board(board, depth).await?);
            }
            Some(views)
        } else {
            None
        };
        Ok(ProjectView { project, boards })
    }

    pub async fn board(&self, id: &BoardId, depth: Depth) -> Result<BoardView> {
        let board: Board = Collection::new(self.store).get(id).await?;
        self.expand_board(board, depth).await
    }

    pub async fn card(&self, id: &CardId, depth: Depth) -> Result<CardView> {
        let card: Card = Collection::new(self.store).get(id).await?;
        self.expand_card(card, depth).await
    }

    pub async fn comment(&self, id: &CommentId, depth: Depth) -> Result<CommentView> {
        let comment: Comment = Collection::new(self.store).get(id).await?;
        let author = if depth >= Depth::Authors {
            self.author(&comment.created_by).await?
        } else {
            None
        };
        Ok(CommentView { comment, author })
    }

    async fn expand_board(&self, board: Board, depth: Depth) -> Result<BoardView> {
        let cards = if depth >= Depth::Cards {
            let cards: Vec<Card> = self.children("board", board.id.as_str(), &board.cards).await?;
            let mut views = Vec::with_capacity(cards.len());
            for card in cards {
                views.push(self.expand_card(card, depth).await?);
            }
            Some(views)
        } else {
            None
        };
        Ok(BoardView { board, cards })
    }

    async fn expand_card(&self, card: Card, depth: Depth) -> Result<CardView> {
        let comments = if depth >= Depth::Comments {
            let comments: Vec<Comment> = self
                .children("card", card.id.as_str(), &card.comments)
                .await?;
            let mut authors: BTreeMap<UserId, Option<AuthorSummary>> = BTreeMap::new();
            let mut views = Vec::with_capacity(comments.len());
            for comment in comments {
                let author = if depth >= Depth::Authors {
                    if !authors.contains_key(&comment.created_by) {
                        let summary = self.author(&comment.created_by).await?;
                        authors.insert(comment.created_by.clone(), summary);
                    }
                    authors.get(&comment.created_by).cloned().flatten()
                } else {
                    None
                };
                views.push(CommentView { comment, author });
            }
            Some(views)
        } else {
            None
        };
        Ok(CardView { card, comments })
    }

    async fn author(&self, id: &UserId) -> Result<Option<AuthorSummary>> {
        match Collection::<User>::new(self.store).get(id).await {
            Ok(user) => Ok(Some(AuthorSummary::from(&user))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Children whose `foreign_key` names `parent_id`, in the order of
    /// `listed`, followed by unlisted children in id order
    async fn children<E: Entity, I: EntityId>(
        &self,
        foreign_key: &str,
        parent_id: &str,
        listed: &[I],
    ) -> Result<Vec<E>> {
        let mut children: Vec<E> = Collection::new(self.store)
            .find(&Filter::all().eq(foreign_key, parent_id))
            .await?;
        let rank = |child: &E| {
            listed
                .iter()
                .position(|id| id.as_str() == child.id().as_str())
                .unwrap_or(usize::MAX)
        };
        children.sort_by_key(rank);
        Ok(children)
    }
}
