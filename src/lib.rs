#![forbid(unsafe_code)]

pub mod composite;
pub mod decode;
pub mod edges;
pub mod error;
pub mod image;
pub mod scene;
pub mod surface;
pub mod transform;

pub use composite::{blit, draw, draw_scaled};
pub use decode::{
    DECODE_CLEAN_RADIUS, decode, decode_from_memory, load, load_from_memory, normalize,
};
pub use edges::clean_edges_rgba;
pub use error::{SoftblitError, SoftblitResult};
pub use image::Image;
pub use scene::{CanvasSpec, Layer, LayerSize, Scene, render_scene};
pub use surface::Surface;
pub use transform::RESIZE_CLEAN_RADIUS;
