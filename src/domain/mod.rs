//! Domain layer - room relay semantics, free of transport concerns.

pub mod foundation;
pub mod room;
