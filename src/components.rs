mod backdrop;
mod figure;
mod host;

pub use backdrop::*;
pub use figure::*;
pub use host::*;
