//! HTTP transport for the discussion board.
//!
//! Maps verbs and paths onto controller actions, extracts submitted form
//! fields and the acting user, keeps flash messages per browser session, and
//! turns [`BoardResponse`](board_protocol::BoardResponse) values back into
//! HTTP responses.

pub mod flash;
pub mod server;

pub use flash::FlashStore;
pub use server::{
    RequestHandler, TransportConfig, TransportServer, build_router, build_router_with_flash,
};
