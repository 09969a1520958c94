//! Cancellable product listing query.
//!
//! Each visitor has one [`CatalogQuery`]. Starting a query bumps a
//! generation counter and sets the state to `Loading`; any query still in
//! flight with an older generation is cancelled at its next poll (its HTTP
//! future is dropped) and can never overwrite the newer state.
//!
//! ```text
//! Idle ──begin──▶ Loading ──run──▶ Loaded | Failed
//!                    ▲                  │
//!                    └──────begin───────┘
//! ```

use std::fmt::Display;
use std::future::Future;

use tokio::sync::watch;
use tracing::{debug, warn};

use shopsmart_core::{Product, QueryState};

/// Message shown when a product listing cannot be fetched.
pub const PRODUCTS_ERROR: &str = "Error fetching products";

/// Current query generation and its state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub generation: u64,
    pub state: QueryState<Vec<Product>>,
}

/// Handle for one started query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a started query must be run"]
pub struct QueryTicket {
    generation: u64,
}

/// How a query run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The query concluded and its state became current.
    Finished(QueryState<Vec<Product>>),
    /// A newer query started first; nothing was written.
    Superseded,
}

/// A visitor's product listing query.
#[derive(Debug, Default)]
pub struct CatalogQuery {
    tx: watch::Sender<QuerySnapshot>,
}

impl CatalogQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query, superseding any query in flight.
    pub fn begin(&self) -> QueryTicket {
        let mut generation = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.generation = snapshot.generation.wrapping_add(1);
            snapshot.state = QueryState::Loading;
            generation = snapshot.generation;
        });
        debug!(generation, "Catalog query started");
        QueryTicket { generation }
    }

    /// Drive a started query to completion.
    ///
    /// `fetch` is dropped as soon as a newer query begins. Failures become
    /// [`QueryState::Failed`] with a generic message; the cause is logged.
    pub async fn run<F, E>(&self, ticket: QueryTicket, fetch: F) -> QueryOutcome
    where
        F: Future<Output = Result<Vec<Product>, E>>,
        E: Display,
    {
        let rx = self.tx.subscribe();

        tokio::select! {
            result = fetch => {
                let state = match result {
                    Ok(products) => QueryState::Loaded(products),
                    Err(e) => {
                        warn!(error = %e, "Product query failed");
                        QueryState::Failed(PRODUCTS_ERROR.to_string())
                    }
                };
                self.finish(ticket, state)
            }
            () = superseded(rx, ticket.generation) => {
                debug!(generation = ticket.generation, "Catalog query superseded");
                QueryOutcome::Superseded
            }
        }
    }

    /// Write a query's final state if it is still current.
    fn finish(&self, ticket: QueryTicket, state: QueryState<Vec<Product>>) -> QueryOutcome {
        let mut outcome = QueryOutcome::Superseded;
        self.tx.send_if_modified(|snapshot| {
            if snapshot.generation != ticket.generation {
                return false;
            }
            snapshot.state = state.clone();
            outcome = QueryOutcome::Finished(state);
            true
        });
        outcome
    }

    /// Current generation and state.
    #[must_use]
    pub fn snapshot(&self) -> QuerySnapshot {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.tx.subscribe()
    }

    /// Wait until no query is in flight and return the concluded state.
    ///
    /// Returns immediately unless the current state is `Loading`. A query
    /// whose request was dropped leaves `Loading` in place, so callers
    /// should bound the wait.
    pub async fn settled(&self) -> QueryState<Vec<Product>> {
        let mut rx = self.subscribe();
        match rx.wait_for(|snapshot| !snapshot.state.is_loading()).await {
            Ok(snapshot) => snapshot.state.clone(),
            // Unreachable while `self` holds the sender
            Err(_) => self.snapshot().state,
        }
    }
}

/// Resolves once the current generation moves past `generation`.
async fn superseded(mut rx: watch::Receiver<QuerySnapshot>, generation: u64) {
    while rx.borrow_and_update().generation == generation {
        if rx.changed().await.is_err() {
            // Sender gone: nothing can supersede this query any more.
            std::future::pending::<()>().await;
        }
    }
}
