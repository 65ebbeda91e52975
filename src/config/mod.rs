mod library;
mod project;
mod store;
mod types;
mod validate;

pub use library::*;
pub use project::*;
pub use store::*;
pub use types::*;
pub use validate::*;
