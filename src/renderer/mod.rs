//! WebGPU rendering module
//!
//! Draws the wheel and arrow procedurally with SDFs in the fragment shader;
//! no sprite atlas, just one fullscreen triangle and a uniform block.

pub mod wheel_pipeline;

pub use wheel_pipeline::{FrameParams, WheelRenderState};
