//! Room HTTP endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::RoomHandlers;
pub use routes::room_routes;
