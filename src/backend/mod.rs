mod local;
#[cfg(test)]
mod memory;
mod traits;

pub use local::*;
#[cfg(test)]
pub use memory::*;
pub use traits::*;
