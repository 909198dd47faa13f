pub mod config;
pub mod error;
pub mod saved_loop;
pub mod source;
pub mod store;


pub use config::*;
pub use error::*;
pub use saved_loop::*;
pub use source::*;
pub use store::*;
