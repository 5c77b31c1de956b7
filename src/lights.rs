//! Where palettes go.
//!
//! Device protocols live behind [`LightSink`]. [`apply_palette`] spreads a
//! palette of any length over however many devices the sink has.

use crate::color::Color;
use crate::error::{Error, Result};

pub trait LightSink {
    fn device_count(&self) -> usize;

    fn set_color(&mut self, index: usize, color: Color) -> Result<()>;
}

/// Set device `i` to `palette[i % palette.len()]`.
///
/// A device that fails is logged and skipped. Returns how many devices were
/// updated.
pub fn apply_palette<S: LightSink + ?Sized>(sink: &mut S, palette: &[Color]) -> usize {
    let devices = sink.device_count();
    if devices == 0 {
        log::warn!("No lights available to control");
        return 0;
    }
    if palette.is_empty() {
        log::warn!("No colors provided to set lights");
        return 0;
    }

    let mut updated = 0;
    for index in 0..devices {
        let color = palette[index % palette.len()];
        match sink.set_color(index, color) {
            Ok(()) => updated += 1,
            Err(e) => log::error!("Failed to set light {index} to {color}: {e}"),
        }
    }
    updated
}

/// Log-only lights, for running without hardware.
#[derive(Clone, Debug)]
pub struct DemoLights {
    names: Vec<String>,
    current: Vec<Option<Color>>,
}

impl DemoLights {
    pub fn new(count: usize) -> Self {
        Self::with_names((1..=count).map(|i| format!("Demo Light {i}")))
    }

    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let current = vec![None; names.len()];
        Self { names, current }
    }

    /// The last color sent to each light.
    pub fn current(&self) -> &[Option<Color>] {
        &self.current
    }
}

impl Default for DemoLights {
    fn default() -> Self {
        Self::new(3)
    }
}

impl LightSink for DemoLights {
    fn device_count(&self) -> usize {
        self.names.len()
    }

    fn set_color(&mut self, index: usize, color: Color) -> Result<()> {
        let Some(name) = self.names.get(index) else {
            return Err(Error::Light {
                index,
                message: format!("only {} demo lights", self.names.len()),
            });
        };
        log::info!("Demo mode: set light {index} ({name}) to {color}");
        self.current[index] = Some(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const GREEN: Color = Color::new(0, 255, 0);

    #[test]
    fn cycles_colors_over_devices() {
        let mut lights = DemoLights::new(5);
        assert_eq!(apply_palette(&mut lights, &[RED, GREEN]), 5);
        assert_eq!(
            lights.current(),
            &[Some(RED), Some(GREEN), Some(RED), Some(GREEN), Some(RED)]
        );
    }

    #[test]
    fn extra_colors_are_unused() {
        let mut lights = DemoLights::new(1);
        apply_palette(&mut lights, &[GREEN, RED, RED]);
        assert_eq!(lights.current(), &[Some(GREEN)]);
    }

    #[test]
    fn out_of_range_light_is_an_error() {
        let mut lights = DemoLights::new(2);
        let err = lights.set_color(2, RED).unwrap_err();
        assert!(matches!(err, Error::Light { index: 2, .. }));
        assert_eq!(lights.current(), &[None, None]);
    }

    #[test]
    fn empty_palette_is_noop() {
        let mut lights = DemoLights::default();
        assert_eq!(apply_palette(&mut lights, &[]), 0);
        assert!(lights.current().iter().all(Option::is_none));
    }

    struct Flaky {
        seen: Vec<usize>,
    }

    impl LightSink for Flaky {
        fn device_count(&self) -> usize {
            3
        }

        fn set_color(&mut self, index: usize, _color: Color) -> Result<()> {
            if index == 1 {
                return Err(Error::Light {
                    index,
                    message: "unreachable".into(),
                });
            }
            self.seen.push(index);
            Ok(())
        }
    }

    #[test]
    fn failing_device_does_not_stop_the_rest() {
        let mut sink = Flaky { seen: Vec::new() };
        assert_eq!(apply_palette(&mut sink, &[RED]), 2);
        assert_eq!(sink.seen, vec![0, 2]);
    }
}
