//! EventStore implementations

pub mod filesystem;

pub use filesystem::FileSystemEventStore;
