//! Parent/child relation descriptors

use crate::types::EntityKind;

/// How a parent's child-id list mirrors its children.
///
/// `foreign_key` names the child field pointing at the parent; relations
/// without one (project membership) are maintained from the parent side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub name: &'static str,
    pub parent: EntityKind,
    pub child: EntityKind,
    pub list_field: &'static str,
    pub foreign_key: Option<&'static str>,
    /// Whether list order is meaningful and positional inserts are honoured
    pub ordered: bool,
}

/// Project.boards <-> Board.project
pub const PROJECT_BOARDS: Relation = Relation {
    name: "project boards",
    parent: EntityKind::Project,
    child: EntityKind::Board,
    list_field: "boards",
    foreign_key: Some("project"),
    ordered: false,
};

/// Board.cards <-> Card.board
pub const BOARD_CARDS: Relation = Relation {
    name: "board cards",
    parent: EntityKind::Board,
    child: EntityKind::Card,
    list_field: "cards",
    foreign_key: Some("board"),
    ordered: true,
};

/// Card.comments <-> Comment.card
pub const CARD_COMMENTS: Relation = Relation {
    name: "card comments",
    parent: EntityKind::Card,
    child: EntityKind::Comment,
    list_field: "comments",
    foreign_key: Some("card"),
    ordered: false,
};

/// Project.users membership
pub const PROJECT_MEMBERS: Relation = Relation {
    name: "project members",
    parent: EntityKind::Project,
    child: EntityKind::User,
    list_field: "users",
    foreign_key: None,
    ordered: false,
};

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
