//! Refresh invocation with at-most-one-in-flight semantics
//!
//! The caller's action runs on a spawned tokio task; its result comes back
//! over a channel tagged with the ticket that started it, so gesture handling
//! never blocks on the refresh.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The caller-supplied asynchronous refresh operation
#[async_trait]
pub trait RefreshAction: Send + Sync + 'static {
    type Error: Send + 'static;

    async fn refresh(&self) -> Result<(), Self::Error>;
}

/// Adapter turning an async closure into a [`RefreshAction`]
pub struct FnAction<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> FnAction<F, E> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _error: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut, E> RefreshAction for FnAction<F, E>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Send + 'static,
{
    type Error = E;

    async fn refresh(&self) -> Result<(), E> {
        (self.f)().await
    }
}

/// Identifies one in-flight invocation of the refresh action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RefreshTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion of one invocation; `result` is exactly what the action returned
#[derive(Debug)]
pub struct RefreshOutcome<E> {
    pub ticket: RefreshTicket,
    pub result: Result<(), E>,
}

impl<E> RefreshOutcome<E> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the refresh action, never more than one invocation at a time
pub struct RefreshInvoker<A: RefreshAction> {
    action: Arc<A>,
    next_ticket: u64,
    live: Option<RefreshTicket>,
    done_tx: mpsc::UnboundedSender<RefreshOutcome<A::Error>>,
    done_rx: mpsc::UnboundedReceiver<RefreshOutcome<A::Error>>,
}

impl<A: RefreshAction> RefreshInvoker<A> {
    pub fn new(action: A) -> Self {
        Self::from_arc(Arc::new(action))
    }

    pub fn from_arc(action: Arc<A>) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            action,
            next_ticket: 1,
            live: None,
            done_tx,
            done_rx,
        }
    }

    /// Ticket of the invocation currently in flight, if any
    #[inline]
    pub fn live_ticket(&self) -> Option<RefreshTicket> {
        self.live
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.live.is_some()
    }

    /// Start the refresh action unless one is already pending.
    ///
    /// Returns the new ticket, or `None` when the call was a no-op. Must be
    /// called from within a tokio runtime.
    pub fn trigger(&mut self) -> Option<RefreshTicket> {
        if let Some(live) = self.live {
            debug!(ticket = %live, "Refresh already in flight, ignoring trigger");
            return None;
        }

        let ticket = RefreshTicket(self.next_ticket);
        self.next_ticket += 1;
        self.live = Some(ticket);

        let action = Arc::clone(&self.action);
        let tx = self.done_tx.clone();
        info!(ticket = %ticket, "Starting refresh");
        tokio::spawn(async move {
            let result = action.refresh().await;
            if tx.send(RefreshOutcome { ticket, result }).is_err() {
                warn!(ticket = %ticket, "Refresh finished after its controller was dropped");
            }
        });

        Some(ticket)
    }

    /// Take a finished invocation without waiting
    pub fn try_complete(&mut self) -> Option<RefreshOutcome<A::Error>> {
        let outcome = self.done_rx.try_recv().ok()?;
        self.settle(&outcome);
        Some(outcome)
    }

    /// Wait for the pending invocation to finish.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn complete(&mut self) -> Option<RefreshOutcome<A::Error>> {
        if self.live.is_none() {
            return self.try_complete();
        }
        // The invoker holds a sender, so the channel never closes under us
        let outcome = self.done_rx.recv().await?;
        self.settle(&outcome);
        Some(outcome)
    }

    fn settle(&mut self, outcome: &RefreshOutcome<A::Error>) {
        if self.live == Some(outcome.ticket) {
            self.live = None;
        }
        if outcome.result.is_ok() {
            info!(ticket = %outcome.ticket, "Refresh completed");
        } else {
            warn!(ticket = %outcome.ticket, "Refresh action failed");
        }
    }
}
