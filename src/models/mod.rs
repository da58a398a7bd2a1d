mod api;
mod catalog;
mod local;
mod surface;

pub use api::*;
pub use catalog::*;
pub use local::*;
pub use surface::*;
