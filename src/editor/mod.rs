mod app;
mod session;
mod sync;

pub use app::*;
pub use session::*;
pub use sync::*;
