mod listener;
mod page;
pub mod params;
mod ws;

pub use listener::{bind, router, serve, AppState};
