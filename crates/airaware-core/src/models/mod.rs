//! Data models for AirAware

mod alert;
mod category;
mod forecast;
mod limits;
mod reading;

pub use alert::*;
pub use category::*;
pub use forecast::*;
pub use limits::*;
pub use reading::*;
