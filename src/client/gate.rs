//! Single-flight gate for session refresh.
//!
//! When several requests hit an expired access token at once, exactly one
//! of them performs the refresh. The rest park on a oneshot channel and
//! receive the leader's outcome, then retry with the renewed session.

use crate::client::error::ClientError;
use tokio::sync::{oneshot, Mutex};

enum GateState {
    Idle,
    Refreshing(Vec<oneshot::Sender<Result<(), ClientError>>>),
}

/// Outcome of asking the gate for entry.
pub enum Ticket {
    /// This caller must perform the refresh and publish the result.
    Leader,
    /// Another caller is already refreshing; await its outcome.
    Follower(oneshot::Receiver<Result<(), ClientError>>),
}

pub struct RefreshGate {
    state: Mutex<GateState>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Idle),
        }
    }

    /// Join the refresh. The first caller while idle becomes the leader,
    /// everyone else queues behind it.
    pub async fn enter(&self) -> Ticket {
        let mut state = self.state.lock().await;
        match &mut *state {
            GateState::Idle => {
                *state = GateState::Refreshing(Vec::new());
                Ticket::Leader
            }
            GateState::Refreshing(waiters) => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Ticket::Follower(rx)
            }
        }
    }

    /// Publish the leader's outcome to every queued follower and reopen
    /// the gate.
    pub async fn release(&self, outcome: Result<(), ClientError>) {
        let mut state = self.state.lock().await;
        if let GateState::Refreshing(waiters) = std::mem::replace(&mut *state, GateState::Idle) {
            for waiter in waiters {
                // A follower that gave up waiting is fine to skip.
                let _ = waiter.send(outcome.clone());
            }
        }
    }
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn first_caller_leads_then_gate_reopens() {
        let gate = RefreshGate::new();

        assert!(matches!(gate.enter().await, Ticket::Leader));
        assert!(matches!(gate.enter().await, Ticket::Follower(_)));

        gate.release(Ok(())).await;

        assert!(matches!(gate.enter().await, Ticket::Leader));
    }

    #[tokio::test]
    async fn followers_observe_the_leader_outcome() {
        let gate = Arc::new(RefreshGate::new());

        assert!(matches!(gate.enter().await, Ticket::Leader));

        let mut receivers = Vec::new();
        for _ in 0..3 {
            match gate.enter().await {
                Ticket::Follower(rx) => receivers.push(rx),
                Ticket::Leader => panic!("gate already has a leader"),
            }
        }

        gate.release(Err(ClientError::SessionExpired)).await;

        for rx in receivers {
            assert_eq!(rx.await.unwrap(), Err(ClientError::SessionExpired));
        }
    }
}
