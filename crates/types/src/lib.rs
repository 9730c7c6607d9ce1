mod coverage;
mod recipe;
mod request;

pub use coverage::*;
pub use recipe::*;
pub use request::*;
