#![forbid(unsafe_code)]

pub mod content;
pub mod repository;
pub mod sqlite;

pub use content::JsonContentDir;
pub use repository::{
    ContentSource, DEFAULT_SLOT_KEY, InMemorySlot, ProgressSlot, StaticContent, Storage,
    StorageError,
};
