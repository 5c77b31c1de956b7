//! Color-theory reshaping of an extracted palette.
//!
//! The first color is the anchor: it is returned untouched and its hue,
//! saturation and value seed every generated color. All schemes except
//! monochromatic keep the anchor's saturation and value and move the hue.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::color::{Color, HsvColor};
use crate::error::Error;

/// Hue step between variations of the same base hue.
const HUE_STEP: f64 = 0.05;

/// Names are case-insensitive wherever they are parsed, JSON included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HarmonyScheme {
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    Monochromatic,
}

impl HarmonyScheme {
    pub const ALL: [HarmonyScheme; 5] = [
        HarmonyScheme::Complementary,
        HarmonyScheme::Analogous,
        HarmonyScheme::Triadic,
        HarmonyScheme::Tetradic,
        HarmonyScheme::Monochromatic,
    ];

    /// Relative likelihood of each scheme when none is configured.
    pub fn weight(self) -> f64 {
        match self {
            HarmonyScheme::Complementary => 0.2,
            HarmonyScheme::Analogous => 0.3,
            HarmonyScheme::Triadic => 0.2,
            HarmonyScheme::Tetradic => 0.1,
            HarmonyScheme::Monochromatic => 0.2,
        }
    }

    /// Weighted random pick.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL
            .choose_weighted(rng, |scheme| scheme.weight())
            .copied()
            .unwrap_or(HarmonyScheme::Analogous)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HarmonyScheme::Complementary => "complementary",
            HarmonyScheme::Analogous => "analogous",
            HarmonyScheme::Triadic => "triadic",
            HarmonyScheme::Tetradic => "tetradic",
            HarmonyScheme::Monochromatic => "monochromatic",
        }
    }
}

impl fmt::Display for HarmonyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HarmonyScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == name)
            .ok_or_else(|| Error::UnknownScheme(s.to_string()))
    }
}

impl TryFrom<String> for HarmonyScheme {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<HarmonyScheme> for String {
    fn from(scheme: HarmonyScheme) -> Self {
        scheme.as_str().to_string()
    }
}

/// Reshape `colors` with `scheme`. The output has the same length as the
/// input and starts with the unchanged anchor.
pub fn harmonize(colors: &[Color], scheme: HarmonyScheme) -> Vec<Color> {
    let Some((&anchor, _)) = colors.split_first() else {
        return Vec::new();
    };
    if colors.len() == 1 {
        return vec![anchor];
    }

    let generated = harmony_hsv(anchor.to_hsv(), scheme, colors.len());
    std::iter::once(anchor)
        .chain(generated.into_iter().skip(1).map(HsvColor::to_rgb))
        .collect()
}

/// [`harmonize`] with a scheme drawn from `rng`.
pub fn harmonize_random<R: Rng + ?Sized>(
    colors: &[Color],
    rng: &mut R,
) -> (HarmonyScheme, Vec<Color>) {
    let scheme = HarmonyScheme::choose(rng);
    (scheme, harmonize(colors, scheme))
}

fn wrap(h: f64) -> f64 {
    h.rem_euclid(1.0)
}

/// `len` HSV colors, the first being `base`.
fn harmony_hsv(base: HsvColor, scheme: HarmonyScheme, len: usize) -> Vec<HsvColor> {
    let with_hue = |h: f64| HsvColor::new(wrap(h), base.s, base.v);
    let mut result = Vec::with_capacity(len);
    result.push(base);

    match scheme {
        HarmonyScheme::Complementary => {
            let complement = wrap(base.h + 0.5);
            result.push(with_hue(complement));
            for i in 0..len.saturating_sub(2) {
                let offset = (i + 1) as f64 * HUE_STEP;
                let origin = if i % 2 == 0 { base.h } else { complement };
                result.push(with_hue(origin + offset));
            }
        }
        HarmonyScheme::Analogous => {
            for i in 1..len {
                result.push(with_hue(base.h + (i as f64 * HUE_STEP) % 0.3));
            }
        }
        HarmonyScheme::Triadic => polygon(&mut result, base, 3, len),
        HarmonyScheme::Tetradic => polygon(&mut result, base, 4, len),
        HarmonyScheme::Monochromatic => {
            for i in 1..len {
                let s_offset = (i as f64 * 0.15) % 0.6 - 0.3;
                let v_offset = (i as f64 * 0.1) % 0.4 - 0.2;
                result.push(HsvColor::new(
                    base.h,
                    (base.s + s_offset).clamp(0.1, 1.0),
                    (base.v + v_offset).clamp(0.2, 0.9),
                ));
            }
        }
    }

    result.truncate(len);
    result
}

/// Evenly spaced hues around the wheel, then variations of those vertices.
fn polygon(result: &mut Vec<HsvColor>, base: HsvColor, sides: usize, len: usize) {
    for i in 1..sides.min(len) {
        let h = base.h + i as f64 / sides as f64;
        result.push(HsvColor::new(wrap(h), base.s, base.v));
    }
    for i in sides..len {
        let vertex = result[i % sides].h;
        let offset = ((i / sides) + 1) as f64 * HUE_STEP;
        result.push(HsvColor::new(wrap(vertex + offset), base.s, base.v));
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const RED: Color = Color::new(255, 0, 0);

    fn sample_palette(n: usize) -> Vec<Color> {
        (0..n)
            .map(|i| Color::new(200, (40 + i * 20) as u8, (90 + i * 10) as u8))
            .collect()
    }

    #[test]
    fn preserves_length_and_anchor() {
        for scheme in HarmonyScheme::ALL {
            for n in 0..=9 {
                let colors = sample_palette(n);
                let out = harmonize(&colors, scheme);
                assert_eq!(out.len(), n, "{scheme} with {n} colors");
                if n > 0 {
                    assert_eq!(out[0], colors[0], "{scheme} anchor");
                }
            }
        }
    }

    #[test]
    fn single_color_is_unchanged() {
        assert_eq!(harmonize(&[RED], HarmonyScheme::Complementary), vec![RED]);
    }

    #[test]
    fn complementary_of_red_is_cyan() {
        let out = harmonize(&[RED, RED], HarmonyScheme::Complementary);
        assert_eq!(out[1], Color::new(0, 255, 255));
    }

    #[test]
    fn complementary_alternates_around_both_hues() {
        let hsv = harmony_hsv(RED.to_hsv(), HarmonyScheme::Complementary, 5);
        let hues: Vec<f64> = hsv.iter().map(|c| c.h).collect();
        let expected = [0.0, 0.5, 0.05, 0.6, 0.15];
        for (h, e) in hues.iter().zip(expected) {
            assert!((h - e).abs() < 1e-9, "{hues:?}");
        }
    }

    #[test]
    fn triadic_of_red_is_primaries() {
        let out = harmonize(&[RED, RED, RED], HarmonyScheme::Triadic);
        assert_eq!(out[1], Color::new(0, 255, 0));
        assert_eq!(out[2], Color::new(0, 0, 255));
    }

    /// Reference output of the hexcone conversion with truncation, for a
    /// seven-color palette anchored on (212, 84, 74).
    #[test]
    fn schemes_match_reference_truncation() {
        let anchor = Color::new(212, 84, 74);
        let colors = vec![anchor; 7];
        let cases: [(HarmonyScheme, [(u8, u8, u8); 6]); 5] = [
            (
                HarmonyScheme::Complementary,
                [
                    (73, 201, 212), (212, 125, 73), (73, 119, 212),
                    (212, 208, 73), (111, 73, 212), (133, 212, 73),
                ],
            ),
            (
                HarmonyScheme::Analogous,
                [
                    (212, 125, 73), (212, 166, 73), (212, 208, 73),
                    (174, 212, 73), (133, 212, 73), (212, 84, 73),
                ],
            ),
            (
                HarmonyScheme::Triadic,
                [
                    (73, 212, 83), (84, 73, 212), (212, 166, 73),
                    (73, 212, 166), (166, 73, 212), (212, 208, 73),
                ],
            ),
            (
                HarmonyScheme::Tetradic,
                [
                    (133, 212, 73), (73, 201, 212), (153, 73, 212),
                    (212, 166, 73), (73, 212, 97), (73, 119, 212),
                ],
            ),
            (
                HarmonyScheme::Monochromatic,
                [
                    (186, 99, 93), (212, 84, 74), (229, 59, 45),
                    (161, 108, 104), (186, 99, 93), (212, 84, 74),
                ],
            ),
        ];

        for (scheme, expected) in cases {
            let out = harmonize(&colors, scheme);
            assert_eq!(out[0], anchor, "{scheme} anchor");
            let expected: Vec<Color> =
                expected.iter().map(|&(r, g, b)| Color::new(r, g, b)).collect();
            assert_eq!(out[1..], expected[..], "{scheme}");
        }
    }

    #[test]
    fn polygon_variations_follow_vertices() {
        let hsv = harmony_hsv(RED.to_hsv(), HarmonyScheme::Tetradic, 7);
        let expected = [0.0, 0.25, 0.5, 0.75, 0.1, 0.35, 0.6];
        for (c, e) in hsv.iter().zip(expected) {
            assert!((c.h - e).abs() < 1e-9, "{hsv:?}");
        }

        let hsv = harmony_hsv(RED.to_hsv(), HarmonyScheme::Triadic, 7);
        let expected = [0.0, 1.0 / 3.0, 2.0 / 3.0, 0.1, 1.0 / 3.0 + 0.1, 2.0 / 3.0 + 0.1, 0.15];
        for (c, e) in hsv.iter().zip(expected) {
            assert!((c.h - e).abs() < 1e-9, "{hsv:?}");
        }
    }

    #[test]
    fn analogous_wraps_within_thirty_percent() {
        let base = HsvColor::new(0.9, 0.8, 0.7);
        let hsv = harmony_hsv(base, HarmonyScheme::Analogous, 8);
        for (i, c) in hsv.iter().enumerate().skip(1) {
            let offset = (i as f64 * 0.05) % 0.3;
            assert!((c.h - (0.9 + offset) % 1.0).abs() < 1e-9);
            assert_eq!((c.s, c.v), (0.8, 0.7));
        }
    }

    #[test]
    fn monochromatic_keeps_hue() {
        let colors = vec![Color::new(200, 120, 60); 5];
        let anchor_hue = colors[0].to_hsv().h;
        for c in harmonize(&colors, HarmonyScheme::Monochromatic) {
            assert!((c.to_hsv().h - anchor_hue).abs() < 0.01, "{c:?}");
        }
    }

    #[test]
    fn monochromatic_clamps_saturation_and_value() {
        let base = HsvColor::new(0.3, 0.05, 0.95);
        for c in harmony_hsv(base, HarmonyScheme::Monochromatic, 6).iter().skip(1) {
            assert!((0.1..=1.0).contains(&c.s));
            assert!((0.2..=0.9).contains(&c.v));
            assert_eq!(c.h, 0.3);
        }
    }

    #[test]
    fn parses_scheme_names() {
        assert_eq!("Triadic".parse::<HarmonyScheme>().unwrap(), HarmonyScheme::Triadic);
        assert!(matches!(
            "pastel".parse::<HarmonyScheme>(),
            Err(Error::UnknownScheme(_))
        ));

        let from_json: HarmonyScheme = serde_json::from_str(r#""Tetradic""#).unwrap();
        assert_eq!(from_json, HarmonyScheme::Tetradic);
        assert_eq!(serde_json::to_string(&from_json).unwrap(), r#""tetradic""#);
    }

    #[test]
    fn weighted_choice_is_seeded() {
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20).map(|_| HarmonyScheme::choose(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(9), draw(9));

        let colors = sample_palette(4);
        let (scheme, out) = harmonize_random(&colors, &mut StdRng::seed_from_u64(3));
        assert_eq!(out, harmonize(&colors, scheme));

        let mut rng = StdRng::seed_from_u64(1);
        let mut counts = [0usize; 5];
        for _ in 0..2000 {
            let scheme = HarmonyScheme::choose(&mut rng);
            let idx = HarmonyScheme::ALL.iter().position(|s| *s == scheme).unwrap();
            counts[idx] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0));
        assert!(counts[1] > counts[3], "analogous should outdraw tetradic: {counts:?}");
    }
}
