use std::fs;
use std::path::PathBuf;

use super::{RoomStore, Snapshot};
use crate::config::{Settings, SettingsUpdate};
use crate::error::{RentError, Result};
use crate::ledger::{Room, RoomId};

/// Document store kept in a single JSON file.
///
/// Every call reads the file and every put rewrites it, so separate
/// processes see each other's writes. A missing file reads as an empty store.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
                Err(unavailable(format!("directory {} does not exist", dir.display())))
            }
            _ => Ok(Self { path }),
        }
    }

    pub fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| unavailable(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&content).map_err(|e| RentError::StateParse {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let content = serde_json::to_string_pretty(snapshot).map_err(|e| RentError::StateParse {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, content)
            .map_err(|e| unavailable(format!("{}: {e}", self.path.display())))
    }
}

fn unavailable(reason: String) -> RentError {
    RentError::StoreUnavailable {
        backend: "json".to_string(),
        reason,
    }
}

impl RoomStore for JsonStore {
    fn get_room(&self, id: RoomId) -> Result<Option<Room>> {
        Ok(self.load()?.room(id).cloned())
    }

    fn put_room(&mut self, room: Room) -> Result<()> {
        let mut snapshot = self.load()?;
        snapshot.upsert(room);
        self.save(&snapshot)
    }

    fn get_settings(&self) -> Result<Settings> {
        Ok(self.load()?.settings)
    }

    fn put_settings(&mut self, update: SettingsUpdate) -> Result<Settings> {
        let mut snapshot = self.load()?;
        snapshot.settings = snapshot.settings.merge(&update);
        self.save(&snapshot)?;
        Ok(snapshot.settings)
    }

    fn all_rooms(&self) -> Result<Vec<Room>> {
        let mut rooms = self.load()?.rooms;
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }

    fn backend(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("rooms.json")).unwrap();

        assert!(store.all_rooms().unwrap().is_empty());
        assert_eq!(store.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rooms.json");

        let mut store = JsonStore::open(&path).unwrap();
        store.put_room(Room::new(1, "Room 01", "Asha")).unwrap();
        store
            .put_settings(SettingsUpdate {
                base_rent: None,
                unit_rate: Some(8.0),
            })
            .unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.get_room(1).unwrap().unwrap().tenant_name, "Asha");
        assert_eq!(reopened.get_settings().unwrap().unit_rate, 8.0);
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = JsonStore::open(dir.path().join("nope").join("rooms.json")).unwrap_err();
        assert!(matches!(err, RentError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rooms.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonStore::open(&path).unwrap();
        assert!(matches!(store.all_rooms(), Err(RentError::StateParse { .. })));
    }

    #[test]
    fn test_document_uses_camel_case_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rooms.json");
        let mut store = JsonStore::open(&path).unwrap();
        store.put_room(Room::new(3, "Room 03", "Asha")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["settings"]["baseRent"], 3000.0);
        assert_eq!(raw["rooms"][0]["roomNumber"], "Room 03");
        assert!(raw["rooms"][0]["monthlyData"].is_object());
    }
}
