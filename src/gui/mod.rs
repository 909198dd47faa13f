pub mod app;
pub mod controls;
pub mod saved_loops;
pub mod timeline;


pub use app::*;
pub use controls::TransportCommand;
