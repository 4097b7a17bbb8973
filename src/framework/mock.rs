//! # Mock Store & Testing Guide
//!
//! `MockStore` hands out a real [`StoreClient`] whose requests are answered from a queue of
//! expectations instead of an in-memory map. It makes store failures and odd store contents
//! trivial to stage, which a real `StoreActor` cannot do.
//!
//! ## When to use Mocks vs the Real Store
//!
//! | Feature | MockStore | StoreActor |
//! |---------|-----------|------------|
//! | **State** | None, scripted replies | Real orders |
//! | **Determinism** | Replies in the order they were queued | Depends on earlier writes |
//! | **Error Injection** | Easy (`return_err`) | Not possible |
//! | **Use Case** | Failure paths of the order actor | Behaviour and invariants end to end |
//!
//! ## Example
//!
//! ```rust
//! use order_lifecycle::framework::mock::MockStore;
//! use order_lifecycle::framework::{FrameworkError, OrderStore};
//! use order_lifecycle::model::OrderId;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockStore::new();
//!     mock.expect_find_by_id(OrderId(1)).return_ok(None);
//!     mock.expect_find_ongoing()
//!         .return_err(FrameworkError::Unavailable("disk full".into()));
//!
//!     let store = mock.client();
//!     assert_eq!(store.find_by_id(OrderId(1)).await.unwrap(), None);
//!     assert!(store.find_ongoing().await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! A request that arrives out of order, or with no expectation left, is dropped unanswered
//! (the caller sees [`FrameworkError::ActorDropped`]) and recorded; `verify()` then panics
//! listing every mismatch.

use crate::framework::client::StoreClient;
use crate::framework::error::FrameworkError;
use crate::framework::message::StoreRequest;
use crate::model::{Order, OrderId, OrderState, UserId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock store and the reply to give.
#[derive(Debug)]
enum Expectation {
    FindDraftsByCustomer {
        customer: UserId,
        response: Result<Vec<Order>, FrameworkError>,
    },
    FindEarliestPlaced {
        response: Result<Option<Order>, FrameworkError>,
    },
    FindOngoing {
        response: Result<Vec<Order>, FrameworkError>,
    },
    FindById {
        id: OrderId,
        response: Result<Option<Order>, FrameworkError>,
    },
    Save {
        response: Result<Order, FrameworkError>,
    },
    SaveIf {
        expected: OrderState,
        response: Result<Option<Order>, FrameworkError>,
    },
    Count {
        response: Result<u64, FrameworkError>,
    },
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    mismatches: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock order store with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockStore::new();
/// mock.expect_find_ongoing().return_ok(vec![]);
/// mock.expect_find_by_id(OrderId(4)).return_ok(None);
///
/// let store = mock.client();
/// // Use store in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockStore {
    client: StoreClient,
    state: Shared,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates a new mock store with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest>(100);
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&task_state).expectations.pop_front();
                if let Err(mismatch) = answer(request, expectation) {
                    lock(&task_state).mismatches.push(mismatch);
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns the client to hand to the code under test.
    pub fn client(&self) -> StoreClient {
        self.client.clone()
    }

    pub fn expect_find_drafts_by_customer(&mut self, customer: UserId) -> ExpectationBuilder<Vec<Order>> {
        self.builder(move |response| Expectation::FindDraftsByCustomer { customer, response })
    }

    pub fn expect_find_earliest_placed(&mut self) -> ExpectationBuilder<Option<Order>> {
        self.builder(|response| Expectation::FindEarliestPlaced { response })
    }

    pub fn expect_find_ongoing(&mut self) -> ExpectationBuilder<Vec<Order>> {
        self.builder(|response| Expectation::FindOngoing { response })
    }

    pub fn expect_find_by_id(&mut self, id: OrderId) -> ExpectationBuilder<Option<Order>> {
        self.builder(move |response| Expectation::FindById { id, response })
    }

    pub fn expect_save(&mut self) -> ExpectationBuilder<Order> {
        self.builder(|response| Expectation::Save { response })
    }

    pub fn expect_save_if(&mut self, expected: OrderState) -> ExpectationBuilder<Option<Order>> {
        self.builder(move |response| Expectation::SaveIf { expected, response })
    }

    pub fn expect_count(&mut self) -> ExpectationBuilder<u64> {
        self.builder(|response| Expectation::Count { response })
    }

    /// Verifies that all expectations were met and no request went unexpected.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.mismatches.is_empty() {
            panic!("Unexpected store requests: {:?}", state.mismatches);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn builder<R>(
        &mut self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation + Send + 'static,
    ) -> ExpectationBuilder<R> {
        ExpectationBuilder {
            state: self.state.clone(),
            wrap: Box::new(wrap),
        }
    }
}

/// Builder returned by every `expect_*` method.
pub struct ExpectationBuilder<R> {
    state: Shared,
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation + Send>,
}

impl<R> ExpectationBuilder<R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        lock(&self.state).expectations.push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        lock(&self.state).expectations.push_back(expectation);
    }
}

/// Replies to `request` when it matches `expectation`, otherwise describes the mismatch.
fn answer(request: StoreRequest, expectation: Option<Expectation>) -> Result<(), String> {
    match (request, expectation) {
        (
            StoreRequest::FindDraftsByCustomer {
                customer,
                respond_to,
            },
            Some(Expectation::FindDraftsByCustomer {
                customer: expected,
                response,
            }),
        ) if customer == expected => {
            let _ = respond_to.send(response);
        }
        (
            StoreRequest::FindEarliestPlaced { respond_to },
            Some(Expectation::FindEarliestPlaced { response }),
        ) => {
            let _ = respond_to.send(response);
        }
        (StoreRequest::FindOngoing { respond_to }, Some(Expectation::FindOngoing { response })) => {
            let _ = respond_to.send(response);
        }
        (
            StoreRequest::FindById { id, respond_to },
            Some(Expectation::FindById {
                id: expected,
                response,
            }),
        ) if id == expected => {
            let _ = respond_to.send(response);
        }
        (StoreRequest::Save { respond_to, .. }, Some(Expectation::Save { response })) => {
            let _ = respond_to.send(response);
        }
        (
            StoreRequest::SaveIf {
                expected,
                respond_to,
                ..
            },
            Some(Expectation::SaveIf {
                expected: wanted,
                response,
            }),
        ) if expected == wanted => {
            let _ = respond_to.send(response);
        }
        (StoreRequest::Count { respond_to, .. }, Some(Expectation::Count { response })) => {
            let _ = respond_to.send(response);
        }
        (request, expectation) => {
            return Err(format!("got {request:?}, expected {expectation:?}"));
        }
    }
    Ok(())
}
