//! Plain data handed to the (external) shading pass.
//! - Material: tagged material variants and their constant blocks

pub mod material;

pub use material::{BlinnPhongParams, BrdfParams, Material, ShaderParameterBlock};
