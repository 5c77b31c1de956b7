use image::DynamicImage;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::color::Color;
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::extract::{ExtractOptions, extract};
use crate::harmony::{HarmonyScheme, harmonize};

/// Extracts a palette from each bitmap and optionally harmonizes it.
///
/// Owns a validated configuration snapshot and the random source used to pick
/// harmony schemes, so one analyzer gives reproducible output when
/// `harmony_seed` is set.
#[derive(Debug)]
pub struct ColorAnalyzer {
    config: AnalyzerConfig,
    options: ExtractOptions,
    rng: StdRng,
}

impl ColorAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        log::info!(
            "Initializing color analyzer to extract {} colors using {}",
            config.num_colors,
            config.algorithm
        );
        let rng = match config.harmony_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            options: config.extract_options(),
            config,
            rng,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Extract and, when enabled, harmonize with the configured scheme.
    pub fn analyze(&mut self, image: &DynamicImage) -> Vec<Color> {
        self.analyze_with_scheme(image, None)
    }

    /// Like [`analyze`](Self::analyze), with `scheme` taking precedence over the
    /// configured one. Without either, a weighted random scheme is drawn.
    pub fn analyze_with_scheme(
        &mut self,
        image: &DynamicImage,
        scheme: Option<HarmonyScheme>,
    ) -> Vec<Color> {
        self.analyze_detailed(image, scheme).0
    }

    /// The palette together with the harmony scheme that shaped it, `None`
    /// when harmony is disabled or the palette is too short to harmonize.
    pub fn analyze_detailed(
        &mut self,
        image: &DynamicImage,
        scheme: Option<HarmonyScheme>,
    ) -> (Vec<Color>, Option<HarmonyScheme>) {
        let colors = extract(image, &self.options);
        log::debug!("Extracted colors: {colors:?}");

        if !self.config.color_harmony || colors.len() <= 1 {
            return (colors, None);
        }

        let scheme = scheme
            .or(self.config.harmony_scheme)
            .unwrap_or_else(|| HarmonyScheme::choose(&mut self.rng));
        let harmonized = harmonize(&colors, scheme);
        log::debug!("Applied {scheme} harmony: {harmonized:?}");
        (harmonized, Some(scheme))
    }
}
