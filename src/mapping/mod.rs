pub mod lifecycle;
pub mod model;
pub mod store;

pub use lifecycle::*;
pub use model::*;
pub use store::*;
