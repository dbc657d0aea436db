pub mod polygon;
pub mod vec;

pub use polygon::*;
pub use vec::*;
