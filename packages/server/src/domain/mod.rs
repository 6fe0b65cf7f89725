//! Domain layer: identifiers, entities, wire messages and the abstractions
//! the use cases depend on.

pub mod entity;
pub mod error;
pub mod message;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{Event, UploadedImage};
pub use error::{PushError, StorageError, ValueObjectError};
pub use message::{KioskInbound, KioskMessage, MobileInbound, MobileMessage};
pub use repository::EventStore;
pub use session::{
    ConnectionHandle, Delivery, PushFrame, PusherChannel, SessionRegistry, SessionSnapshot,
};
pub use value_object::{ClientId, ConnectionId, EventId, EventName, ImageId};
