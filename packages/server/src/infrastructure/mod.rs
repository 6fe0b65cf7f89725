//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod dto;
pub mod image;
pub mod repository;
pub mod session;
