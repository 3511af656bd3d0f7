//! Membership index
//!
//! The two views of the socket/room relation and every mutation on them.
//! Both maps are only ever touched through the methods below so that:
//!
//! - `socket ∈ rooms[room]` iff `room ∈ sids[socket]`
//! - a key in `rooms` always maps to a non-empty set
//!
//! `sids` may hold an empty set for a socket that left its last room; the
//! entry is dropped by [`MembershipIndex::leave_all`].

use std::collections::{HashMap, HashSet};

use super::event::RegistryEvent;
use super::{Room, SocketId};

/// Room → members and socket → rooms, kept symmetric
#[derive(Debug, Default)]
pub(super) struct MembershipIndex {
    /// Members of each non-empty room
    rooms: HashMap<Room, HashSet<SocketId>>,

    /// Rooms joined by each known socket
    sids: HashMap<SocketId, HashSet<Room>>,
}

impl MembershipIndex {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Add `id` to `room`, creating the room if needed
    pub(super) fn join(&mut self, id: &str, room: &str, events: &mut Vec<RegistryEvent>) {
        self.sids
            .entry(id.to_owned())
            .or_default()
            .insert(room.to_owned());

        let mut created = false;
        let members = self.rooms.entry(room.to_owned()).or_insert_with(|| {
            created = true;
            HashSet::new()
        });

        if created {
            events.push(RegistryEvent::RoomCreated(room.to_owned()));
        }
        if members.insert(id.to_owned()) {
            events.push(RegistryEvent::Joined {
                socket: id.to_owned(),
                room: room.to_owned(),
            });
        }
    }

    /// Remove `id` from `room`, deleting the room once empty
    pub(super) fn leave(&mut self, id: &str, room: &str, events: &mut Vec<RegistryEvent>) {
        if let Some(rooms) = self.sids.get_mut(id) {
            rooms.remove(room);
        }
        self.remove_member(id, room, events);
    }

    /// Remove `id` from every room it joined and forget the socket
    pub(super) fn leave_all(&mut self, id: &str, events: &mut Vec<RegistryEvent>) {
        // Taking the entry out first leaves an owned snapshot to iterate.
        let Some(rooms) = self.sids.remove(id) else {
            return;
        };

        for room in &rooms {
            self.remove_member(id, room, events);
        }
    }

    /// Membership-side half of a leave
    fn remove_member(&mut self, id: &str, room: &str, events: &mut Vec<RegistryEvent>) {
        let Some(members) = self.rooms.get_mut(room) else {
            return;
        };
        if !members.remove(id) {
            return;
        }

        events.push(RegistryEvent::Left {
            socket: id.to_owned(),
            room: room.to_owned(),
        });

        if members.is_empty() {
            self.rooms.remove(room);
            events.push(RegistryEvent::RoomDeleted(room.to_owned()));
        }
    }

    pub(super) fn members(&self, room: &str) -> Option<&HashSet<SocketId>> {
        self.rooms.get(room)
    }

    pub(super) fn rooms_of(&self, id: &str) -> Option<&HashSet<Room>> {
        self.sids.get(id)
    }

    /// Every socket with a reverse-index entry
    pub(super) fn sockets(&self) -> impl Iterator<Item = &SocketId> {
        self.sids.keys()
    }

    pub(super) fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub(super) fn socket_count(&self) -> usize {
        self.sids.len()
    }

    pub(super) fn membership_count(&self) -> usize {
        self.sids.values().map(HashSet::len).sum()
    }

    /// Check both index invariants
    #[cfg(test)]
    pub(super) fn is_consistent(&self) -> bool {
        let rooms_ok = self.rooms.iter().all(|(room, members)| {
            !members.is_empty()
                && members
                    .iter()
                    .all(|id| self.sids.get(id).is_some_and(|r| r.contains(room)))
        });
        let sids_ok = self.sids.iter().all(|(id, rooms)| {
            rooms
                .iter()
                .all(|room| self.rooms.get(room).is_some_and(|m| m.contains(id)))
        });

        rooms_ok && sids_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(index: &mut MembershipIndex, id: &str, room: &str) -> Vec<RegistryEvent> {
        let mut events = Vec::new();
        index.join(id, room, &mut events);
        events
    }

    fn leave(index: &mut MembershipIndex, id: &str, room: &str) -> Vec<RegistryEvent> {
        let mut events = Vec::new();
        index.leave(id, room, &mut events);
        events
    }

    fn leave_all(index: &mut MembershipIndex, id: &str) -> Vec<RegistryEvent> {
        let mut events = Vec::new();
        index.leave_all(id, &mut events);
        events
    }

    #[test]
    fn test_join_creates_room_and_entry() {
        let mut index = MembershipIndex::new();

        let events = join(&mut index, "a", "r");

        assert_eq!(
            events,
            vec![
                RegistryEvent::RoomCreated("r".into()),
                RegistryEvent::Joined {
                    socket: "a".into(),
                    room: "r".into()
                },
            ]
        );
        assert!(index.members("r").unwrap().contains("a"));
        assert!(index.rooms_of("a").unwrap().contains("r"));
        assert!(index.is_consistent());
    }

    #[test]
    fn test_join_is_idempotent() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "r");
        let events = join(&mut index, "a", "r");

        assert!(events.is_empty());
        assert_eq!(index.members("r").unwrap().len(), 1);
        assert_eq!(index.rooms_of("a").unwrap().len(), 1);
        assert_eq!(index.membership_count(), 1);
    }

    #[test]
    fn test_empty_strings_are_valid() {
        let mut index = MembershipIndex::new();

        join(&mut index, "", "");

        assert!(index.members("").unwrap().contains(""));
        assert!(index.is_consistent());
    }

    #[test]
    fn test_leave_deletes_empty_room() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "r");
        let events = leave(&mut index, "a", "r");

        assert_eq!(
            events,
            vec![
                RegistryEvent::Left {
                    socket: "a".into(),
                    room: "r".into()
                },
                RegistryEvent::RoomDeleted("r".into()),
            ]
        );
        assert!(index.members("r").is_none());
        assert_eq!(index.room_count(), 0);

        // Reverse entry survives with an empty set
        assert!(index.rooms_of("a").unwrap().is_empty());
        assert!(index.is_consistent());
    }

    #[test]
    fn test_leave_keeps_non_empty_room() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "r");
        join(&mut index, "b", "r");
        leave(&mut index, "a", "r");

        let members = index.members("r").unwrap();
        assert_eq!(members.len(), 1);
        assert!(members.contains("b"));
        assert!(index.is_consistent());
    }

    #[test]
    fn test_leave_is_idempotent() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "r");
        join(&mut index, "b", "r");
        leave(&mut index, "a", "r");
        let events = leave(&mut index, "a", "r");

        assert!(events.is_empty());
        assert_eq!(index.members("r").unwrap().len(), 1);

        // Unknown socket and unknown room are no-ops
        assert!(leave(&mut index, "ghost", "r").is_empty());
        assert!(leave(&mut index, "b", "nope").is_empty());
        assert!(index.is_consistent());
    }

    #[test]
    fn test_leave_all_removes_everything() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "x");
        join(&mut index, "a", "y");
        join(&mut index, "b", "y");

        let events = leave_all(&mut index, "a");

        assert!(index.rooms_of("a").is_none());
        assert!(index.members("x").is_none());
        assert!(!index.members("y").unwrap().contains("a"));
        assert_eq!(index.socket_count(), 1);
        assert!(events.contains(&RegistryEvent::RoomDeleted("x".into())));
        assert!(!events.contains(&RegistryEvent::RoomDeleted("y".into())));
        assert!(index.is_consistent());
    }

    #[test]
    fn test_leave_all_unknown_socket() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "x");

        assert!(leave_all(&mut index, "ghost").is_empty());
        assert_eq!(index.room_count(), 1);
    }

    #[test]
    fn test_leave_all_after_leaving_every_room() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "x");
        leave(&mut index, "a", "x");
        assert_eq!(index.socket_count(), 1);

        assert!(leave_all(&mut index, "a").is_empty());
        assert_eq!(index.socket_count(), 0);
    }

    #[test]
    fn test_symmetry_over_mixed_sequence() {
        let mut index = MembershipIndex::new();
        let ids = ["a", "b", "c", "d"];
        let rooms = ["r1", "r2", "r3"];

        for (step, id) in ids.iter().cycle().take(40).enumerate() {
            let room = rooms[step % rooms.len()];
            match step % 7 {
                0..=3 => {
                    join(&mut index, id, room);
                }
                4 | 5 => {
                    leave(&mut index, id, room);
                }
                _ => {
                    leave_all(&mut index, id);
                }
            }
            assert!(index.is_consistent(), "inconsistent after step {}", step);
        }
    }

    #[test]
    fn test_counts() {
        let mut index = MembershipIndex::new();

        join(&mut index, "a", "x");
        join(&mut index, "a", "y");
        join(&mut index, "b", "x");

        assert_eq!(index.room_count(), 2);
        assert_eq!(index.socket_count(), 2);
        assert_eq!(index.membership_count(), 3);

        let mut sockets: Vec<_> = index.sockets().cloned().collect();
        sockets.sort();
        assert_eq!(sockets, vec!["a", "b"]);
    }
}
