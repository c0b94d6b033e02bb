pub mod model;
pub mod parameters;
pub mod resource_id;

pub use model::*;
pub use parameters::*;
pub use resource_id::*;
