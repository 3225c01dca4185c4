mod monitor;
mod session;

pub use monitor::monitor;
pub use session::{list, open, read, reply, search};
