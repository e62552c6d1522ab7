use std::path::Path;

use crate::{
    composite,
    decode,
    error::{SoftblitError, SoftblitResult},
    surface::Surface,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub canvas: CanvasSpec,
    pub layers: Vec<Layer>, // drawn in order, bottom to top
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3], // opaque RGB the canvas is cleared to
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub source: String, // image path relative to the scene's asset root
    pub x: i32,
    pub y: i32,
    pub size: Option<LayerSize>, // None draws at intrinsic size
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayerSize {
    pub width: u32,
    pub height: u32,
}

impl Scene {
    pub fn from_json_str(json: &str) -> SoftblitResult<Self> {
        serde_json::from_str(json).map_err(|e| SoftblitError::serde(e.to_string()))
    }

    pub fn validate(&self) -> SoftblitResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SoftblitError::validation("canvas width/height must be > 0"));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            normalize_rel_path(&layer.source)?;
            if let Some(size) = layer.size
                && (size.width == 0 || size.height == 0)
            {
                return Err(SoftblitError::validation(format!(
                    "layer {i} has a zero target dimension"
                )));
            }
        }
        Ok(())
    }
}

/// Render `scene` onto an opaque canvas surface.
///
/// Each layer runs the load pipeline, applies its flips, then composites at
/// its placement (through the resize path when a target size is given).
#[tracing::instrument(skip(scene))]
pub fn render_scene(scene: &Scene, assets_root: &Path) -> SoftblitResult<Surface> {
    scene.validate()?;
    let mut target = Surface::opaque(
        scene.canvas.width,
        scene.canvas.height,
        scene.canvas.background,
    )?;

    for layer in &scene.layers {
        let rel = normalize_rel_path(&layer.source)?;
        let mut img = decode::load(assets_root.join(rel))?;
        if layer.flip_horizontal {
            img.flip_horizontal();
        }
        if layer.flip_vertical {
            img.flip_vertical();
        }
        match layer.size {
            Some(size) => composite::draw_scaled(
                &mut target,
                &img,
                layer.x,
                layer.y,
                size.width,
                size.height,
            )?,
            None => composite::draw(&mut target, &img, layer.x, layer.y),
        }
    }

    Ok(target)
}

pub(crate) fn normalize_rel_path(source: &str) -> SoftblitResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SoftblitError::validation("layer sources must be relative"));
    }
    if s.is_empty() {
        return Err(SoftblitError::validation("layer source must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SoftblitError::validation(
                "layer sources must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SoftblitError::validation(
            "layer source must contain a file name",
        ));
    }

    Ok(out.join("/"))
}
