pub mod assembly;
pub mod fence;
pub mod labels;
pub mod layer;
pub mod lighting;
pub mod models;
pub mod skybox;
pub mod symbology;
pub mod tracks;

pub use assembly::*;
pub use layer::*;
