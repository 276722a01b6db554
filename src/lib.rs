pub mod config;
pub mod error;
pub mod ledger;
pub mod report;
pub mod store;

pub use config::{Config, Settings, SettingsUpdate};
pub use error::{RentError, Result};
pub use ledger::{Ledger, MonthKey, MonthRecord, Room, RoomId, Submission};
pub use store::{JsonStore, MemoryStore, RoomStore};
