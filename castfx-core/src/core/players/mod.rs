pub use errors::*;
pub use events::*;
pub use player::*;
pub use request::*;
pub use state::*;
pub use timeouts::*;

mod errors;
mod events;
mod player;
mod request;
mod state;
mod timeouts;
