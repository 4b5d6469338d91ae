//! Dominant color extraction by k-means clustering in 8-bit RGB space.
//!
//! Steps performed by [`find`]:
//! 1. Shrink the image so its longest side is at most [`THUMBNAIL_EDGE`].
//! 2. Seed up to `k` clusters from randomly sampled, distinct pixel colors
//!    (fixed seed, so results are reproducible).
//! 3. Assign every non-transparent pixel to its nearest centroid and move each
//!    centroid to the mean of its pixels, until nothing moves or the round
//!    budget runs out.
//! 4. Rank clusters by pixel count and return the heaviest one that is neither
//!    too dark nor too bright, or the heaviest one overall.
//!
//! [`find_n`] skips the brightness filter and returns the whole ranked palette
//! with each color's share of the image.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use image::DynamicImage;
use js_sys::{Array, Object, Reflect};
use palette::Srgba;
use wasm_bindgen::prelude::*;

pub mod cluster;
pub mod engine;
pub mod error;
pub mod options;
pub mod sampler;
pub mod select;
pub mod source;

pub use cluster::{Cluster, ClusterSet};
pub use engine::{Clustering, ClusteringEngine, Outcome, PixelSource};
pub use error::{Error, Result};
pub use options::{COMPACT_EDGE, DEFAULT_CLUSTERS, Options, THUMBNAIL_EDGE};
pub use sampler::{Bounds, Sampler, SeededSampler};
pub use select::{BrightnessWindow, ColorSelector, WeightedColor};
pub use source::shrink;

// ------------------------------------------------------------
// Core entry points
// ------------------------------------------------------------

/// The dominant color of `image` using the default options and `cluster_count`
/// clusters (`0` for the default of four).
pub fn find(image: &DynamicImage, cluster_count: usize) -> Srgba<u8> {
    find_image(image, &Options::default().with_cluster_count(cluster_count))
}

/// Ranked palette of up to `cluster_count` colors with their weights.
pub fn find_n(image: &DynamicImage, cluster_count: usize) -> Vec<WeightedColor> {
    find_n_image(image, &Options::default().with_cluster_count(cluster_count))
}

/// [`find`] with explicit options; shrinks to `options.max_edge` first.
pub fn find_image(image: &DynamicImage, options: &Options) -> Srgba<u8> {
    find_with(&*shrink(image, options.max_edge), options)
}

/// [`find_n`] with explicit options; shrinks to `options.max_edge` first.
pub fn find_n_image(image: &DynamicImage, options: &Options) -> Vec<WeightedColor> {
    find_n_with(&*shrink(image, options.max_edge), options)
}

/// Brightness-filtered dominant color of an already small pixel source.
///
/// Returns fully transparent black when there is nothing to cluster.
pub fn find_with<P: PixelSource + ?Sized>(pixels: &P, options: &Options) -> Srgba<u8> {
    let clustering = ClusteringEngine::new(options).run(pixels);
    ColorSelector::new(options.brightness).select(clustering.clusters())
}

/// Unfiltered ranked palette of an already small pixel source.
pub fn find_n_with<P: PixelSource + ?Sized>(pixels: &P, options: &Options) -> Vec<WeightedColor> {
    let clustering = ClusteringEngine::new(options).run(pixels);
    ColorSelector::new(options.brightness).palette(
        clustering.clusters(),
        clustering.total_pixels(),
        options.clusters(),
    )
}

/// `#RRGGBB`, uppercase, alpha dropped.
pub fn hex(color: Srgba<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

// ------------------------------------------------------------
// Encoded input (native)
// ------------------------------------------------------------

#[cfg(not(target_arch = "wasm32"))]
pub fn find_bytes(input: &[u8], options: &Options) -> Result<Srgba<u8>> {
    let img = source::decode(input)?;
    Ok(find_image(&img, options))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn find_n_bytes(input: &[u8], options: &Options) -> Result<Vec<WeightedColor>> {
    let img = source::decode(input)?;
    Ok(find_n_image(&img, options))
}

/// [`find_image`] on a file, format guessed from its contents.
#[cfg(not(target_arch = "wasm32"))]
pub fn find_path(path: impl AsRef<Path>, options: &Options) -> Result<Srgba<u8>> {
    let img = source::open(path)?;
    Ok(find_image(&img, options))
}

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

/// Dominant color of an encoded image (PNG, JPEG, ...) as a `#RRGGBB` string.
#[wasm_bindgen]
pub fn find_dominant(input: Vec<u8>, cluster_count: usize) -> Result<String, JsValue> {
    let img = image::load_from_memory(&input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?;

    Ok(hex(find(&img, cluster_count)))
}

/// Ranked palette of an encoded image as an array of `{ hex, weight }` objects.
#[wasm_bindgen]
pub fn find_dominant_n(input: Vec<u8>, cluster_count: usize) -> Result<Array, JsValue> {
    let img = image::load_from_memory(&input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?;

    let palette_js = Array::new();
    for entry in find_n(&img, cluster_count) {
        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(&hex(entry.color)))?;
        Reflect::set(&obj, &JsValue::from_str("weight"), &JsValue::from_f64(f64::from(entry.weight)))?;
        palette_js.push(&obj);
    }

    Ok(palette_js)
}
