//! Moving cards and boards between parents

use planboard::test_support::{FaultyStore, WriteOp};
use planboard::{
    assemble::Depth,
    board::{AddBoard, GetBoard, UpdateBoard},
    card::{AddCard, MoveCard},
    ActivityLog, BoardId, CardId, EntityKind, ErrorKind, Execute, PlanContext, BOARD_CARDS,
    PROJECT_BOARDS,
};
use std::sync::Arc;

async fn board(ctx: &PlanContext, name: &str) -> BoardId {
    let board = AddBoard::new(name)
        .execute(ctx)
        .await
        .into_result()
        .unwrap();
    BoardId::from_string(board["id"].as_str().unwrap())
}

async fn card(ctx: &PlanContext, board: &BoardId, title: &str) -> CardId {
    let card = AddCard::new(board.clone(), title)
        .execute(ctx)
        .await
        .into_result()
        .unwrap();
    CardId::from_string(card["id"].as_str().unwrap())
}

#[tokio::test]
async fn test_reparent_to_index_zero() {
    let ctx = PlanContext::in_memory();
    let a = board(&ctx, "A").await;
    let b = board(&ctx, "B").await;
    let moving = card(&ctx, &a, "moving").await;
    let first = card(&ctx, &b, "first").await;
    let second = card(&ctx, &b, "second").await;

    let moved = ctx
        .reparent_child(
            &BOARD_CARDS,
            moving.as_str(),
            Some(a.as_str()),
            b.as_str(),
            Some(0),
        )
        .await
        .unwrap();
    assert_eq!(moved["board"], b.as_str());

    assert!(ctx.boards().get(&a).await.unwrap().cards.is_empty());
    assert_eq!(
        ctx.boards().get(&b).await.unwrap().cards,
        vec![moving, first, second]
    );
}

#[tokio::test]
async fn test_reparent_to_same_parent_is_noop() {
    let ctx = PlanContext::in_memory();
    let a = board(&ctx, "A").await;
    let one = card(&ctx, &a, "one").await;
    let two = card(&ctx, &a, "two").await;

    ctx.reparent_child(&BOARD_CARDS, two.as_str(), Some(a.as_str()), a.as_str(), Some(0))
        .await
        .unwrap();
    assert_eq!(ctx.boards().get(&a).await.unwrap().cards, vec![one, two]);
}

#[tokio::test]
async fn test_detach_is_idempotent() {
    let ctx = PlanContext::in_memory();
    let a = board(&ctx, "A").await;
    let keep = card(&ctx, &a, "keep").await;
    let gone = card(&ctx, &a, "gone").await;

    let refs = ctx.backrefs();
    refs.detach_child(&BOARD_CARDS, a.as_str(), gone.as_str())
        .await
        .unwrap();
    refs.detach_child(&BOARD_CARDS, a.as_str(), gone.as_str())
        .await
        .unwrap();
    assert_eq!(ctx.boards().get(&a).await.unwrap().cards, vec![keep]);

    // detaching from a parent that no longer exists is not an error
    refs.detach_child(&BOARD_CARDS, BoardId::new().as_str(), gone.as_str())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_board_moves_between_projects() {
    let ctx = PlanContext::in_memory();
    let p1 = ctx
        .projects()
        .insert(&planboard::Project::new("one"))
        .await
        .unwrap();
    let p2 = ctx
        .projects()
        .insert(&planboard::Project::new("two"))
        .await
        .unwrap();
    let board = AddBoard::new("Roadmap")
        .in_project(p1.id.clone())
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    let board = BoardId::from_string(board["id"].as_str().unwrap());

    UpdateBoard::new(board.clone())
        .with_project(p2.id.clone(), None)
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    assert!(ctx.projects().get(&p1.id).await.unwrap().boards.is_empty());
    assert_eq!(ctx.projects().get(&p2.id).await.unwrap().boards, vec![board.clone()]);
    assert_eq!(
        ctx.boards().get(&board).await.unwrap().project,
        Some(p2.id.clone())
    );

    // unordered relation: position is ignored, the board is appended
    let other = ctx
        .create_child_and_link(
            &planboard::Board::new("Other").in_project(p1.id.clone()),
            &PROJECT_BOARDS,
            p1.id.as_str(),
        )
        .await
        .unwrap();
    ctx.reparent_child(
        &PROJECT_BOARDS,
        other.id.as_str(),
        Some(p1.id.as_str()),
        p2.id.as_str(),
        Some(0),
    )
    .await
    .unwrap();
    assert_eq!(
        ctx.projects().get(&p2.id).await.unwrap().boards,
        vec![board, other.id]
    );
}

#[tokio::test]
async fn test_interrupted_move_still_reads_by_foreign_key() {
    let store = Arc::new(FaultyStore::new());
    let ctx = PlanContext::new(store.clone(), ActivityLog::in_memory());
    let a = board(&ctx, "A").await;
    let b = board(&ctx, "B").await;
    let moving = card(&ctx, &a, "moving").await;

    // the foreign key write succeeds, the list insert fails
    store.fail_on(WriteOp::Update, EntityKind::Board);
    let err = MoveCard::new(moving.clone(), b.clone())
        .execute(&ctx)
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreFailure);
    store.heal();

    assert_eq!(ctx.cards().get(&moving).await.unwrap().board, b);
    assert_eq!(ctx.boards().get(&a).await.unwrap().cards, vec![moving.clone()]);

    // readers trust the foreign key
    let view_a = GetBoard::new(a.clone())
        .with_depth(Depth::Cards)
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    assert_eq!(view_a["cards"].as_array().unwrap().len(), 0);
    let view_b = GetBoard::new(b.clone())
        .with_depth(Depth::Cards)
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    assert_eq!(view_b["cards"][0]["card"]["id"], moving.as_str());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_with_entity_locks() {
    let ctx = Arc::new(PlanContext::in_memory().with_serialized_writes(true));
    let boards = [
        board(&ctx, "A").await,
        board(&ctx, "B").await,
        board(&ctx, "C").await,
    ];
    let moving = card(&ctx, &boards[0], "moving").await;

    let mut handles = Vec::new();
    for i in 0..24 {
        let ctx = ctx.clone();
        let target = boards[i % boards.len()].clone();
        let moving = moving.clone();
        handles.push(tokio::spawn(async move {
            MoveCard::new(moving, target)
                .execute(ctx.as_ref())
                .await
                .into_result()
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let home = ctx.cards().get(&moving).await.unwrap().board;
    for board in &boards {
        let listed = ctx.boards().get(board).await.unwrap().cards;
        if *board == home {
            assert_eq!(listed, vec![moving.clone()]);
        } else {
            assert!(listed.is_empty(), "{board} still lists the card");
        }
    }
}
