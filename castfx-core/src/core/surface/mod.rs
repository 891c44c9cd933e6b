pub use shell::*;
pub use surface::*;

mod shell;
mod surface;
