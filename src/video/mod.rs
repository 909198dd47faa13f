pub mod async_video_info;
pub mod media_driver;
pub mod media_element;
pub mod waveform;

pub use async_video_info::*;
pub use media_driver::*;
pub use media_element::*;
pub use waveform::*;
