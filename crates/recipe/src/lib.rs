mod candidate;
mod error;
mod import;
mod memory;
mod source;
mod store;

pub use candidate::*;
pub use error::*;
pub use import::*;
pub use memory::*;
pub use source::*;
pub use store::*;
