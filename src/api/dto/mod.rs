//! Data Transfer Objects for REST response serialization.

pub mod roster_dto;

pub use roster_dto::*;
