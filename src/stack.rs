//! visionOS solid image stack (best-effort).
//!
//! Produces `AppIcon.solidimagestack/`: three layers, back to front, at 1x
//! (1024px) and 2x (2048px). Back layers are drawn smaller and blurred so the
//! stack reads with depth:
//!
//! ```text
//! layer  shrink  blur@1x  blur@2x
//!   1     0.92     12       24
//!   2     0.96      6       12
//!   3     1.00      0        0
//! ```
//!
//! The asset-catalog schema for solid image stacks is not publicly
//! documented. The `Contents.json` written here lists the layer files and
//! is provisional: if the catalog tool does not pick it up directly, the PNGs
//! can be imported into a Solid Image Stack by hand.
//!
//! Layers bypass the render cache; every (layer, scale) pair has its own
//! pixel size.

use crate::archive::ArchiveFolder;
use crate::catalog::Idiom;
use crate::imaging::calculations::{layer_blur, layer_shrink, plan_layer_draw};
use crate::imaging::{BackendError, RasterBackend, SourceImage};
use crate::manifest::MANIFEST_FILENAME;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STACK_FOLDER: &str = "AppIcon.solidimagestack";
pub const LAYER_COUNT: u32 = 3;
pub const BASE_SIZE: u32 = 1024;
pub const SCALES: [u32; 2] = [1, 2];
const GENERATOR: &str = "assetic";

#[derive(Error, Debug)]
pub enum StackError {
    #[error("layer {index}@{scale}x failed: {source}")]
    Layer {
        index: u32,
        scale: u32,
        #[source]
        source: BackendError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Geometry of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    pub scale: u32,
    /// 1-based, 1 = backmost.
    pub index: u32,
    pub shrink: f64,
    /// Blur radius in pixels at this scale; 0 for the front layer.
    pub blur: f64,
}

impl LayerSpec {
    pub fn filename(&self) -> String {
        format!("layer-{}@{}x.png", self.index, self.scale)
    }
}

/// Stack shape; defaults match the published layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    pub layers: u32,
    pub base_size: u32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            layers: LAYER_COUNT,
            base_size: BASE_SIZE,
        }
    }
}

/// All layers, grouped by scale, back to front within each scale.
pub fn layer_specs(layers: u32) -> Vec<LayerSpec> {
    SCALES
        .iter()
        .flat_map(|&scale| {
            (1..=layers).map(move |index| LayerSpec {
                scale,
                index,
                shrink: layer_shrink(layers, index),
                blur: layer_blur(layers, index, scale),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub idiom: Idiom,
    pub filename: String,
    pub scale: String,
    pub layer: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackInfo {
    pub version: u32,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackProperties {
    pub generator: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub layers: u32,
}

/// Provisional `Contents.json` for the stack folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackContents {
    pub images: Vec<StackEntry>,
    pub info: StackInfo,
    pub properties: StackProperties,
}

impl StackContents {
    fn new(layers: u32) -> Self {
        Self {
            images: Vec::new(),
            info: StackInfo {
                version: 1,
                author: GENERATOR.to_string(),
            },
            properties: StackProperties {
                generator: GENERATOR.to_string(),
                kind: "solid-image-stack".to_string(),
                layers,
            },
        }
    }
}

/// Generated stack folder plus its descriptor.
#[derive(Debug, Clone)]
pub struct SolidImageStack {
    pub folder: ArchiveFolder,
    pub contents: StackContents,
}

/// Render every layer of the stack from an already-decoded source.
pub fn generate_stack(
    backend: &impl RasterBackend,
    source: &SourceImage,
    config: StackConfig,
) -> Result<SolidImageStack, StackError> {
    let source_dims = source.dimensions().as_tuple();
    let mut folder = ArchiveFolder::new(STACK_FOLDER);
    let mut contents = StackContents::new(config.layers);

    for spec in layer_specs(config.layers) {
        let side = config.base_size * spec.scale;
        let params = plan_layer_draw(source_dims, side, spec.shrink, spec.blur);
        debug!(
            "stack layer {}@{}x: {}px inner, blur {}",
            spec.index, spec.scale, params.dst.width, spec.blur
        );

        let layer_err = |err| StackError::Layer {
            index: spec.index,
            scale: spec.scale,
            source: err,
        };
        let canvas = backend.draw(source, &params).map_err(layer_err)?;
        let png = backend.encode_png(&canvas).map_err(layer_err)?;

        let filename = spec.filename();
        folder.add(filename.clone(), png);
        contents.images.push(StackEntry {
            idiom: Idiom::Vision,
            filename,
            scale: format!("{}x", spec.scale),
            layer: spec.index,
        });
    }

    folder.add(MANIFEST_FILENAME, serde_json::to_vec_pretty(&contents)?);
    Ok(SolidImageStack { folder, contents })
}
