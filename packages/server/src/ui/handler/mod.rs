//! Request handlers.

mod http;
mod websocket;

pub use http::{get_room_detail, get_rooms, health_check, post_contact, post_report};
pub use websocket::websocket_handler;
