mod band;
mod dataset;
mod entity;

pub use band::*;
pub use dataset::*;
pub use entity::*;
