use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::protocol::{ClientId, Role, RoomId};

/// One active pairing. Both members are distinct; roles are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub initiator: ClientId,
    pub responder: ClientId,
    pub created_at: Instant,
}

impl Room {
    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.initiator == *client_id || self.responder == *client_id
    }

    pub fn role_of(&self, client_id: &ClientId) -> Option<Role> {
        if self.initiator == *client_id {
            Some(Role::Initiator)
        } else if self.responder == *client_id {
            Some(Role::Responder)
        } else {
            None
        }
    }

    /// The member that is not `client_id`, if `client_id` belongs to the room.
    pub fn other_member(&self, client_id: &ClientId) -> Option<ClientId> {
        match self.role_of(client_id)? {
            Role::Initiator => Some(self.responder),
            Role::Responder => Some(self.initiator),
        }
    }

    pub fn members(&self) -> [ClientId; 2] {
        [self.initiator, self.responder]
    }
}

/// Owns the table of active rooms. Room ids are never reused.
#[derive(Debug, Default)]
pub(crate) struct RoomManager {
    rooms: HashMap<RoomId, Room>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh room. Returns `None` for a degenerate self-pairing.
    pub fn create(&mut self, initiator: ClientId, responder: ClientId) -> Option<Room> {
        if initiator == responder {
            return None;
        }

        let mut id = Uuid::new_v4();
        while self.rooms.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let room = Room {
            id,
            initiator,
            responder,
            created_at: Instant::now(),
        };
        self.rooms.insert(id, room.clone());
        Some(room)
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn remove(&mut self, room_id: &RoomId) -> Option<Room> {
        self.rooms.remove(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    #[cfg(test)]
    pub fn values(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }
}
