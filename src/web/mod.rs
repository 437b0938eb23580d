pub mod downloads;
pub mod responses;
pub mod router;
pub mod session;
pub mod state;
pub mod templates;
pub mod uploads;

pub use responses::{ApiMessage, json_error};
pub use session::{SESSION_COOKIE, SessionStore, resolve_session};
pub use state::AppState;
pub use templates::{escape_html, render_footer};
