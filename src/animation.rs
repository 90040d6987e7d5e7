mod action;
mod driver;

pub use action::*;
pub use driver::*;
