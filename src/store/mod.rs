//! Persistence for rooms and settings.
//!
//! The ledger only needs get/put access; which backend serves it is picked
//! once at startup from `config.toml` and never switched at runtime.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{Settings, SettingsUpdate, StoreBackend, StoreSettings};
use crate::error::Result;
use crate::ledger::{Room, RoomId, DEFAULT_ROOM_COUNT};

pub trait RoomStore {
    fn get_room(&self, id: RoomId) -> Result<Option<Room>>;

    /// Insert or fully replace the room with `room.id`.
    fn put_room(&mut self, room: Room) -> Result<()>;

    fn get_settings(&self) -> Result<Settings>;

    /// Merge `update` into the stored settings and return the result.
    fn put_settings(&mut self, update: SettingsUpdate) -> Result<Settings>;

    /// Every room, ordered by id.
    fn all_rooms(&self) -> Result<Vec<Room>>;

    /// Backend name, for messages
    fn backend(&self) -> &'static str;
}

/// The whole store as one document; the on-disk format of [`JsonStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Snapshot {
    fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    fn upsert(&mut self, room: Room) {
        match self.rooms.iter_mut().find(|r| r.id == room.id) {
            Some(slot) => *slot = room,
            None => {
                self.rooms.push(room);
                self.rooms.sort_by_key(|r| r.id);
            }
        }
    }
}

/// Open the backend named in the config. Relative paths resolve against `cfg_dir`.
///
/// The memory backend starts each process with the default rooms already seeded.
pub fn open_store(settings: &StoreSettings, cfg_dir: &Path) -> Result<Box<dyn RoomStore>> {
    match settings.backend {
        StoreBackend::Memory => Ok(Box::new(MemoryStore::seeded(DEFAULT_ROOM_COUNT))),
        StoreBackend::Json => {
            let path = crate::config::resolve_path(&settings.path, cfg_dir);
            Ok(Box::new(JsonStore::open(path)?))
        }
    }
}

impl<S: RoomStore + ?Sized> RoomStore for Box<S> {
    fn get_room(&self, id: RoomId) -> Result<Option<Room>> {
        (**self).get_room(id)
    }

    fn put_room(&mut self, room: Room) -> Result<()> {
        (**self).put_room(room)
    }

    fn get_settings(&self) -> Result<Settings> {
        (**self).get_settings()
    }

    fn put_settings(&mut self, update: SettingsUpdate) -> Result<Settings> {
        (**self).put_settings(update)
    }

    fn all_rooms(&self) -> Result<Vec<Room>> {
        (**self).all_rooms()
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}
