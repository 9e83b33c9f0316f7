pub mod output;
pub mod script;
pub mod session;

pub use script::{HELP, SessionCommand, parse_line};
pub use session::{CanvasSize, Session, SessionConfig};
