//! Extract representative palettes from wallpapers and screenshots, reshape
//! them with color-harmony rules and hand them to smart lights.
//!
//! The pipeline is `bitmap → extract → (harmonize) → light sink`. Only the
//! first two steps carry logic; the bitmap source and the light sink are
//! traits.
//!
//! ```no_run
//! use wallpaper_light::{AnalyzerConfig, ColorAnalyzer, DemoLights, FileSource};
//! use wallpaper_light::{BitmapSource, apply_palette};
//!
//! let mut analyzer = ColorAnalyzer::new(AnalyzerConfig::default())?;
//! let image = FileSource::new("wallpaper.jpg").capture()?;
//! let palette = analyzer.analyze(&image);
//! apply_palette(&mut DemoLights::default(), &palette);
//! # Ok::<(), wallpaper_light::Error>(())
//! ```

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

pub mod analyzer;
pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod harmony;
pub mod lights;
pub mod source;

pub use analyzer::ColorAnalyzer;
pub use color::{Color, HsvColor};
pub use config::{Algorithm, AnalyzerConfig, ResizeFilter};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, extract};
pub use harmony::{HarmonyScheme, harmonize};
pub use lights::{DemoLights, LightSink, apply_palette};
pub use source::{BitmapSource, FileSource, MemorySource, Region};

/// Decode `input` and run it through a fresh analyzer built from `config`.
pub fn extract_palette_bytes(input: &[u8], config: &AnalyzerConfig) -> Result<Vec<Color>> {
    let image = image::load_from_memory(input)?;
    let mut analyzer = ColorAnalyzer::new(config.clone())?;
    Ok(analyzer.analyze(&image))
}

/// Extract a palette from encoded image bytes.
///
/// Returns `{ palette: string[], scheme: string | undefined }` where every
/// palette entry is `#rrggbb`. `scheme` names the harmony applied, if any.
/// Without an explicit `scheme`, one is drawn from `seed` (or OS entropy).
#[wasm_bindgen]
pub fn extract_palette(
    input: Vec<u8>,
    n_colors: usize,
    algorithm: Option<String>,
    scheme: Option<String>,
    harmony: bool,
    seed: Option<u64>,
) -> std::result::Result<Object, JsValue> {
    let img = image::load_from_memory(&input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?;
    let to_js = |e: Error| JsValue::from_str(&e.to_string());

    let config = AnalyzerConfig {
        num_colors: n_colors,
        algorithm: algorithm
            .as_deref()
            .map(Algorithm::parse_lenient)
            .unwrap_or_default(),
        color_harmony: harmony,
        harmony_scheme: scheme
            .as_deref()
            .map(str::parse::<HarmonyScheme>)
            .transpose()
            .map_err(to_js)?,
        harmony_seed: seed,
        ..AnalyzerConfig::default()
    };
    let mut analyzer = ColorAnalyzer::new(config).map_err(to_js)?;
    let (colors, applied) = analyzer.analyze_detailed(&img, None);

    let palette_js = Array::new();
    for c in &colors {
        palette_js.push(&JsValue::from_str(&c.to_hex()));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    let scheme_js = match applied {
        Some(s) => JsValue::from_str(s.as_str()),
        None => JsValue::UNDEFINED,
    };
    Reflect::set(&result, &JsValue::from_str("scheme"), &scheme_js)?;

    Ok(result)
}
