pub mod animation;
pub mod node;
pub mod transform;
pub mod visibility;

pub use animation::*;
pub use node::*;
pub use transform::*;
pub use visibility::*;
