pub mod blueprint;
pub mod conversion;
pub mod definition;
pub mod loader;

pub use blueprint::*;
pub use conversion::*;
pub use definition::*;
pub use loader::*;
