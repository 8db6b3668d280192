mod common;

use adboard_core::dialogue::DialogueState;
use adboard_core::moderation::{CallbackAction, ModerationAction};
use adboard_core::views::{BoardView, DefaultBoardView, StaffView, SUBMIT_BUTTON};
use adboard_core::{Board, SubmitterInput};
use common::{board, confirm, photo, prepare_ad, seller, text, RecordingTransport, SELLER, STAFF};

/// Presses a moderation button under message 1 and returns the prompt id.
async fn open_prompt(
    board: &Board<RecordingTransport>,
    transport: &RecordingTransport,
    action: ModerationAction,
) -> i32 {
    board
        .handle_staff_callback(STAFF, 1, &CallbackAction::Open(action, SELLER).encode())
        .await
        .expect("callback");
    transport.last_text_to(STAFF).message_id
}

async fn warn(board: &Board<RecordingTransport>, transport: &RecordingTransport, reason: &str) {
    let prompt = open_prompt(board, transport, ModerationAction::Warn).await;
    board
        .handle_staff_reply(STAFF, prompt, reason)
        .await
        .expect("reply");
}

async fn published_board() -> (Board<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::new();
    let board = board(transport.clone());
    prepare_ad(&board, &seller(), &["p1"], "Selling bike").await;
    confirm(&board, &seller()).await;
    (board, transport)
}

#[tokio::test]
async fn test_prompt_registers_pending_action() {
    let (board, transport) = published_board().await;

    let prompt = open_prompt(&board, &transport, ModerationAction::Block).await;
    let sent = transport.last_text_to(STAFF);
    assert_eq!(
        sent.text,
        StaffView::reason_prompt(ModerationAction::Block, "@bike_seller")
    );
    assert_eq!(sent.message_id, prompt);
    assert_eq!(board.pending_actions().await, 1);
}

#[tokio::test]
async fn test_three_warnings_block_and_fourth_is_noop() {
    let (board, transport) = published_board().await;

    warn(&board, &transport, "spam").await;
    assert_eq!(board.warnings(SELLER).await, 1);
    assert_eq!(
        transport.last_text_to(SELLER).text,
        StaffView::warned_user(1, 3, "spam")
    );
    assert_eq!(
        transport.edits().pop().expect("prompt edited").text,
        StaffView::warned("@bike_seller", 1, 3, "spam")
    );

    warn(&board, &transport, "spam again").await;
    assert!(!board.is_blocked(SELLER).await);

    warn(&board, &transport, "third strike").await;
    assert!(board.is_blocked(SELLER).await);
    assert_eq!(
        transport.last_text_to(SELLER).text,
        StaffView::last_warning_user(3, "third strike")
    );

    let to_seller = transport.texts_to(SELLER).len();
    warn(&board, &transport, "one more").await;
    assert_eq!(board.warnings(SELLER).await, 3);
    assert_eq!(transport.texts_to(SELLER).len(), to_seller);
    assert_eq!(
        transport.edits().pop().expect("prompt edited").text,
        StaffView::already_blocked("@bike_seller")
    );
    assert_eq!(board.pending_actions().await, 0);
}

#[tokio::test]
async fn test_resolved_prompt_is_edited() {
    let (board, transport) = published_board().await;

    let prompt = open_prompt(&board, &transport, ModerationAction::Block).await;
    board
        .handle_staff_reply(STAFF, prompt, "scam")
        .await
        .expect("reply");

    let edit = transport.edits().pop().expect("prompt edited");
    assert_eq!(edit.chat_id, STAFF);
    assert_eq!(edit.message_id, prompt);
    assert_eq!(transport.last_text_to(STAFF).message_id, prompt);
    assert_eq!(edit.text, StaffView::blocked("@bike_seller", "scam"));
    assert_eq!(
        transport.last_text_to(SELLER).text,
        StaffView::blocked_user("scam")
    );
    assert!(board.is_blocked(SELLER).await);
}

#[tokio::test]
async fn test_blocked_submitter_gets_notice_and_nothing_changes() {
    let transport = RecordingTransport::new();
    let board = board(transport.clone());
    let from = seller();

    board
        .handle_submitter(&from, text(SUBMIT_BUTTON))
        .await
        .expect("submit");
    board
        .handle_submitter(&from, photo("p1"))
        .await
        .expect("photo");

    let prompt = open_prompt(&board, &transport, ModerationAction::Block).await;
    board
        .handle_staff_reply(STAFF, prompt, "fraud")
        .await
        .expect("reply");

    let before = board.draft(SELLER).await;
    for input in [
        SubmitterInput::Start,
        text(SUBMIT_BUTTON),
        photo("p2"),
        text("some caption"),
        SubmitterInput::Other,
    ] {
        board.handle_submitter(&from, input).await.expect("input");
        assert_eq!(
            transport.last_text_to(SELLER).text,
            DefaultBoardView::blocked_notice()
        );
    }
    assert_eq!(board.draft(SELLER).await, before);
    assert_eq!(
        board.dialogue_state(SELLER).await,
        DialogueState::CollectingPhotos
    );
}

#[tokio::test]
async fn test_cancel_button_drops_pending_action() {
    let (board, transport) = published_board().await;

    let prompt = open_prompt(&board, &transport, ModerationAction::Warn).await;
    board
        .handle_staff_callback(STAFF, prompt, &CallbackAction::Cancel.encode())
        .await
        .expect("cancel");

    assert_eq!(board.pending_actions().await, 0);
    assert_eq!(board.warnings(SELLER).await, 0);
    let edit = transport.edits().pop().expect("prompt edited");
    assert_eq!(edit.message_id, prompt);
    assert_eq!(edit.text, StaffView::cancelled(ModerationAction::Warn));

    board
        .handle_staff_reply(STAFF, prompt, "late reason")
        .await
        .expect("late reply");
    assert_eq!(board.warnings(SELLER).await, 0);
}

#[tokio::test]
async fn test_cancel_reply_drops_pending_action() {
    let (board, transport) = published_board().await;

    let prompt = open_prompt(&board, &transport, ModerationAction::Block).await;
    board
        .handle_staff_reply(STAFF, prompt, "  Cancel ")
        .await
        .expect("cancel reply");

    assert_eq!(board.pending_actions().await, 0);
    assert!(!board.is_blocked(SELLER).await);
    let edit = transport.edits().pop().expect("prompt edited");
    assert_eq!(edit.text, StaffView::cancelled(ModerationAction::Block));
}

#[tokio::test]
async fn test_unrelated_replies_are_ignored() {
    let (board, transport) = published_board().await;
    let prompt = open_prompt(&board, &transport, ModerationAction::Warn).await;
    let sent = transport.message_count();

    board
        .handle_staff_reply(STAFF, prompt + 100, "random chatter")
        .await
        .expect("reply");
    board
        .handle_staff_reply(SELLER, prompt, "not staff")
        .await
        .expect("reply");

    assert_eq!(transport.message_count(), sent);
    assert_eq!(board.pending_actions().await, 1);
    assert_eq!(board.warnings(SELLER).await, 0);
}

#[tokio::test]
async fn test_callbacks_outside_staff_group_are_ignored() {
    let (board, transport) = published_board().await;
    let sent = transport.message_count();

    board
        .handle_staff_callback(SELLER, 1, &CallbackAction::Open(ModerationAction::Block, SELLER).encode())
        .await
        .expect("callback");
    board
        .handle_staff_callback(STAFF, 1, "mod:ban:1")
        .await
        .expect("callback");

    assert_eq!(transport.message_count(), sent);
    assert_eq!(board.pending_actions().await, 0);
}

#[tokio::test]
async fn test_help_answers_until_blocked() {
    let transport = RecordingTransport::new();
    let board = board(transport.clone());

    board.handle_help(&seller()).await.expect("help");
    assert_eq!(transport.last_text_to(SELLER).text, DefaultBoardView::help());

    let prompt = open_prompt(&board, &transport, ModerationAction::Block).await;
    board
        .handle_staff_reply(STAFF, prompt, "fraud")
        .await
        .expect("reply");

    board.handle_help(&seller()).await.expect("help");
    assert_eq!(
        transport.last_text_to(SELLER).text,
        DefaultBoardView::blocked_notice()
    );
    assert_eq!(board.dialogue_state(SELLER).await, DialogueState::Idle);
}
