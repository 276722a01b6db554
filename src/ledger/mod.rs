//! Billing engine and the service that runs it against a store.

mod carry;
mod month;
mod record;
mod submit;

pub use carry::{carry_forward_from, resolve_month, CarryForward, Resolved};
pub use month::MonthKey;
pub use record::{
    ElectricityRecord, ElectricityStatus, MonthRecord, MonthlyData, RentRecord, RentStatus, Room,
    RoomId,
};
pub use submit::{submit_month, units_consumed, Submission};

use log::{info, warn};

use crate::config::{Settings, SettingsUpdate};
use crate::error::{RentError, Result};
use crate::store::RoomStore;

/// Rooms created by `init` when no count is given
pub const DEFAULT_ROOM_COUNT: u32 = 16;

/// Runs the engine against a [`RoomStore`].
///
/// Methods that read and then write take `&mut self`, so a read-modify-write
/// on a room never interleaves with another through the same ledger.
pub struct Ledger<S: RoomStore> {
    store: S,
}

impl<S: RoomStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> Result<Settings> {
        self.store.get_settings()
    }

    pub fn rooms(&self) -> Result<Vec<Room>> {
        self.store.all_rooms()
    }

    pub fn room(&self, id: RoomId) -> Result<Room> {
        self.store.get_room(id)?.ok_or(RentError::RoomNotFound(id))
    }

    /// Create rooms `1..=count` numbered `Room 01`, `Room 02`, ...
    pub fn seed(&mut self, count: u32) -> Result<Vec<Room>> {
        let existing = self.store.all_rooms()?;
        if !existing.is_empty() {
            return Err(RentError::AlreadySeeded(existing.len()));
        }

        let rooms: Vec<Room> = (1..=count).map(Room::numbered).collect();
        for room in &rooms {
            self.store.put_room(room.clone())?;
        }
        info!("Seeded {} rooms in {} store", rooms.len(), self.store.backend());
        Ok(rooms)
    }

    /// The record for one room and month, materializing carry-forward on first read.
    pub fn month(&mut self, id: RoomId, month: MonthKey) -> Result<(Room, MonthRecord)> {
        let mut room = self.room(id)?;
        let settings = self.store.get_settings()?;
        let record = self.resolve(&mut room, month, &settings)?;
        Ok((room, record))
    }

    /// Same record as [`Ledger::month`], but nothing is written back.
    pub fn peek(&self, id: RoomId, month: MonthKey) -> Result<(Room, MonthRecord)> {
        let room = self.room(id)?;
        let settings = self.store.get_settings()?;
        let mut monthly = room.monthly_data.clone();
        let record = resolve_month(&mut monthly, month, &settings).record;
        Ok((room, record))
    }

    /// Every room's record for `month`, materializing where a previous month exists.
    pub fn month_view(&mut self, month: MonthKey) -> Result<Vec<(Room, MonthRecord)>> {
        let settings = self.store.get_settings()?;
        let mut view = Vec::new();
        for mut room in self.store.all_rooms()? {
            let record = self.resolve(&mut room, month, &settings)?;
            view.push((room, record));
        }
        Ok(view)
    }

    fn resolve(&mut self, room: &mut Room, month: MonthKey, settings: &Settings) -> Result<MonthRecord> {
        let resolved = resolve_month(&mut room.monthly_data, month, settings);
        if resolved.materialized {
            self.store.put_room(room.clone())?;
        }
        Ok(resolved.record)
    }

    /// Validate and apply a submission, then persist the room.
    pub fn submit(&mut self, id: RoomId, month: MonthKey, submission: &Submission) -> Result<Room> {
        submission.validate()?;
        let mut room = self.room(id)?;
        let settings = self.store.get_settings()?;

        submit_month(&mut room, month, &settings, submission);
        self.store.put_room(room.clone())?;
        Ok(room)
    }

    pub fn rename_tenant(&mut self, id: RoomId, tenant_name: &str) -> Result<Room> {
        let tenant_name = tenant_name.trim();
        if tenant_name.is_empty() {
            return Err(RentError::validation("tenantName", "Tenant name is required"));
        }
        let mut room = self.room(id)?;
        room.tenant_name = tenant_name.to_string();
        self.store.put_room(room.clone())?;
        Ok(room)
    }

    /// Merge `update` into the settings. Stored months keep their amounts.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<Settings> {
        update.validate()?;
        let settings = self.store.put_settings(update)?;
        info!(
            "Settings now base rent {:.2}, unit rate {:.2}",
            settings.base_rent, settings.unit_rate
        );
        Ok(settings)
    }

    /// Remove `month` from every room. Returns how many rooms had it.
    ///
    /// Later months that already carried a balance out of `month` keep it.
    pub fn reset_month(&mut self, month: MonthKey) -> Result<usize> {
        let mut cleared = 0;
        for mut room in self.store.all_rooms()? {
            if room.monthly_data.remove(&month).is_none() {
                continue;
            }
            if room.monthly_data.contains_key(&month.next()) {
                warn!(
                    "Room {}: {} still carries balances from removed {month}",
                    room.id,
                    month.next()
                );
            }
            self.store.put_room(room)?;
            cleared += 1;
        }
        info!("Reset {month} in {cleared} room(s)");
        Ok(cleared)
    }

    /// Clear every month of every room and restore default settings.
    pub fn reset_all(&mut self) -> Result<Settings> {
        for mut room in self.store.all_rooms()? {
            room.monthly_data.clear();
            self.store.put_room(room)?;
        }
        let defaults = Settings::default();
        let settings = self.store.put_settings(SettingsUpdate {
            base_rent: Some(defaults.base_rent),
            unit_rate: Some(defaults.unit_rate),
        })?;
        info!("Reset all monthly data and settings");
        Ok(settings)
    }
}
