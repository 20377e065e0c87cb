//! Request handlers.

mod dispatch;
mod http;
mod page;
mod websocket;

pub use http::{get_room_detail, get_rooms, health_check};
pub use page::{chat_page, login_page};
pub use websocket::websocket_handler;
