use std::collections::{HashSet, VecDeque};

use crate::protocol::ClientId;

/// FIFO of clients waiting for a partner. A client is present at most once.
#[derive(Debug, Default)]
pub(crate) struct WaitingQueue {
    order: VecDeque<ClientId>,
    members: HashSet<ClientId>,
}

impl WaitingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.members.contains(client_id)
    }

    /// Append `client_id` at the tail. Returns false if it was already queued.
    pub fn enqueue(&mut self, client_id: ClientId) -> bool {
        if !self.members.insert(client_id) {
            return false;
        }
        self.order.push_back(client_id);
        true
    }

    /// Take the longest-waiting client.
    pub fn dequeue(&mut self) -> Option<ClientId> {
        let head = self.order.pop_front()?;
        self.members.remove(&head);
        Some(head)
    }

    /// Drop `client_id` wherever it sits. Returns false if it was not queued.
    pub fn remove(&mut self, client_id: &ClientId) -> bool {
        if !self.members.remove(client_id) {
            return false;
        }
        self.order.retain(|queued| queued != client_id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientId> {
        self.order.iter()
    }
}
