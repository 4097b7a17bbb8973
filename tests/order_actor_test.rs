use chrono::Utc;
use order_lifecycle::framework::mock::MockStore;
use order_lifecycle::framework::FrameworkError;
use order_lifecycle::model::{Item, ItemId, Order, OrderId, OrderState, User, UserId};
use order_lifecycle::notify::LogNotifier;
use order_lifecycle::order_actor::{self, OrderContext, OrderError, MAX_CLAIM_ATTEMPTS};
use std::sync::Arc;

fn alice() -> User {
    User::customer(UserId(1), "Alice", "alice@example.com")
}

fn bob() -> User {
    User::worker(UserId(2), "Bob", "bob@example.com")
}

fn order_in(id: u32, state: OrderState, worker: Option<UserId>) -> Order {
    let mut order = Order::draft(UserId(1), Utc::now());
    order.id = OrderId(id);
    order
        .add_item(Item::new(ItemId(1), 10.0, ["basil"]), Utc::now())
        .unwrap();
    if state != OrderState::Draft {
        order.confirm().unwrap();
    }
    if state == OrderState::Ongoing {
        order.claim(worker.unwrap()).unwrap();
    }
    order
}

fn context(mock: &MockStore) -> OrderContext {
    OrderContext::new(Arc::new(mock.client()), Arc::new(LogNotifier))
}

/// Integration test: real Order actor over a scripted store.
/// Every store call the actor makes must be anticipated, in order.
#[tokio::test]
async fn test_compose_creates_first_draft() {
    let mut mock = MockStore::new();
    mock.expect_find_ongoing().return_ok(vec![]);
    mock.expect_find_drafts_by_customer(UserId(1)).return_ok(vec![]);
    mock.expect_save()
        .return_ok(order_in(7, OrderState::Draft, None));

    let (actor, client) = order_actor::new(8);
    let handle = tokio::spawn(actor.run(context(&mock)));

    let draft = client
        .compose_order(&alice(), Item::new(ItemId(1), 10.0, ["basil"]))
        .await
        .expect("compose failed");
    assert_eq!(draft.id, OrderId(7));
    assert_eq!(draft.state, OrderState::Draft);

    drop(client);
    handle.await.unwrap().unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_store_failure_surfaces_as_persistence_error() {
    let mut mock = MockStore::new();
    mock.expect_find_ongoing().return_ok(vec![]);
    mock.expect_find_drafts_by_customer(UserId(1))
        .return_err(FrameworkError::Unavailable("disk full".to_string()));

    let (actor, client) = order_actor::new(8);
    let handle = tokio::spawn(actor.run(context(&mock)));

    let result = client
        .compose_order(&alice(), Item::new(ItemId(1), 10.0, ["basil"]))
        .await;
    assert!(
        matches!(result, Err(OrderError::PersistenceError(ref msg)) if msg.contains("disk full")),
        "got {result:?}"
    );

    drop(client);
    handle.await.unwrap().unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_duplicate_drafts_are_an_invariant_violation() {
    let mut mock = MockStore::new();
    mock.expect_find_ongoing().return_ok(vec![]);
    mock.expect_find_drafts_by_customer(UserId(1)).return_ok(vec![
        order_in(1, OrderState::Draft, None),
        order_in(2, OrderState::Draft, None),
    ]);
    mock.expect_find_drafts_by_customer(UserId(1)).return_ok(vec![
        order_in(1, OrderState::Draft, None),
        order_in(2, OrderState::Draft, None),
    ]);

    let (actor, client) = order_actor::new(8);
    let handle = tokio::spawn(actor.run(context(&mock)));

    // Neither call may reach save.
    let composed = client
        .compose_order(&alice(), Item::new(ItemId(3), 4.0, ["basil"]))
        .await;
    assert!(matches!(composed, Err(OrderError::InvariantViolation(_))));
    let confirmed = client.confirm_order(&alice()).await;
    assert!(matches!(confirmed, Err(OrderError::InvariantViolation(_))));

    drop(client);
    handle.await.unwrap().unwrap();
    mock.verify();
}

/// Another process took the first candidate between the read and the write.
#[tokio::test]
async fn test_claim_moves_on_after_losing_a_race() {
    let mut mock = MockStore::new();
    mock.expect_find_ongoing().return_ok(vec![]);
    mock.expect_find_earliest_placed()
        .return_ok(Some(order_in(1, OrderState::Placed, None)));
    mock.expect_save_if(OrderState::Placed).return_ok(None);
    mock.expect_find_earliest_placed()
        .return_ok(Some(order_in(2, OrderState::Placed, None)));
    mock.expect_save_if(OrderState::Placed)
        .return_ok(Some(order_in(2, OrderState::Ongoing, Some(UserId(2)))));

    let (actor, client) = order_actor::new(8);
    let handle = tokio::spawn(actor.run(context(&mock)));

    let claimed = client.claim_next_order(&bob()).await.unwrap().unwrap();
    assert_eq!(claimed.id, OrderId(2));
    let active = client.active_order(&bob()).await.unwrap();
    assert_eq!(active.map(|o| o.id), Some(OrderId(2)));

    drop(client);
    handle.await.unwrap().unwrap();
    mock.verify();
}

/// A store that keeps offering a candidate it will not let anyone claim.
#[tokio::test]
async fn test_claim_gives_up_on_a_store_that_never_accepts() {
    let mut mock = MockStore::new();
    mock.expect_find_ongoing().return_ok(vec![]);
    for _ in 0..MAX_CLAIM_ATTEMPTS {
        mock.expect_find_earliest_placed()
            .return_ok(Some(order_in(1, OrderState::Placed, None)));
        mock.expect_save_if(OrderState::Placed).return_ok(None);
    }

    let (actor, client) = order_actor::new(8);
    let handle = tokio::spawn(actor.run(context(&mock)));

    let result = client.claim_next_order(&bob()).await;
    assert!(matches!(result, Err(OrderError::PersistenceError(_))), "got {result:?}");

    // The actor is still serving.
    assert_eq!(client.active_order(&bob()).await.unwrap(), None);

    drop(client);
    handle.await.unwrap().unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_refused_completion_keeps_assignment() {
    let ongoing = order_in(5, OrderState::Ongoing, Some(UserId(2)));
    let mut mock = MockStore::new();
    mock.expect_find_ongoing().return_ok(vec![ongoing.clone()]);
    mock.expect_find_by_id(OrderId(5)).return_ok(Some(ongoing));
    mock.expect_save_if(OrderState::Ongoing).return_ok(None);

    let (actor, client) = order_actor::new(8);
    let handle = tokio::spawn(actor.run(context(&mock)));

    let result = client.complete_order(&bob(), OrderId(5)).await;
    assert!(matches!(result, Err(OrderError::InvariantViolation(_))));
    let active = client.active_order(&bob()).await.unwrap();
    assert_eq!(active.map(|o| o.id), Some(OrderId(5)));

    drop(client);
    handle.await.unwrap().unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_inconsistent_store_stops_startup() {
    let mut mock = MockStore::new();
    mock.expect_find_ongoing().return_ok(vec![
        order_in(1, OrderState::Ongoing, Some(UserId(2))),
        order_in(2, OrderState::Ongoing, Some(UserId(2))),
    ]);

    let (actor, client) = order_actor::new(8);
    let handle = tokio::spawn(actor.run(context(&mock)));

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(OrderError::InvariantViolation(_))));

    let request = client.active_order(&bob()).await;
    assert!(matches!(request, Err(OrderError::ActorCommunicationError(_))));
    mock.verify();
}

#[tokio::test]
async fn test_unreachable_store_stops_startup() {
    let mut mock = MockStore::new();
    mock.expect_find_ongoing()
        .return_err(FrameworkError::Unavailable("connection refused".to_string()));

    let (actor, _client) = order_actor::new(8);
    let result = actor.run(context(&mock)).await;

    assert!(matches!(result, Err(OrderError::PersistenceError(_))));
    mock.verify();
}
