mod band;
mod error;
mod implicit;
mod normalize;
mod reference;
mod select;

pub use band::*;
pub use error::*;
pub use implicit::*;
pub use normalize::*;
pub use reference::*;
pub use select::*;
