use std::collections::BTreeMap;

use super::RoomStore;
use crate::config::{Settings, SettingsUpdate};
use crate::error::Result;
use crate::ledger::{Room, RoomId};

/// Process-local store with default settings. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: BTreeMap<RoomId, Room>,
    settings: Settings,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding rooms `1..=count` as `Ledger::seed` numbers them.
    pub fn seeded(count: u32) -> Self {
        Self {
            rooms: (1..=count).map(|id| (id, Room::numbered(id))).collect(),
            settings: Settings::default(),
        }
    }
}

impl RoomStore for MemoryStore {
    fn get_room(&self, id: RoomId) -> Result<Option<Room>> {
        Ok(self.rooms.get(&id).cloned())
    }

    fn put_room(&mut self, room: Room) -> Result<()> {
        self.rooms.insert(room.id, room);
        Ok(())
    }

    fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings)
    }

    fn put_settings(&mut self, update: SettingsUpdate) -> Result<Settings> {
        self.settings = self.settings.merge(&update);
        Ok(self.settings)
    }

    fn all_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.rooms.values().cloned().collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
