//! Filesystem-backed storage

pub mod event;

pub use event::FileSystemEventStore;
