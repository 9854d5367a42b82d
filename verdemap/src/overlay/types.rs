//! Overlay types and the map-capability seam.

use chrono::NaiveDate;
use thiserror::Error;

use crate::aoi::GeoBounds;

/// One dated raster layer positioned over a geographic rectangle.
///
/// Descriptors are immutable for the lifetime of a completed session; the
/// cursor only changes which one is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    /// Acquisition date of the rendered image.
    pub date: NaiveDate,
    /// Reference to the rendered raster, resolvable by the map toolkit.
    pub image_url: String,
    /// Overlay extent.
    pub bounds: GeoBounds,
}

/// Errors from overlay handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// A cursor cannot be built over zero layers; callers treat an empty
    /// result as success-with-no-data instead.
    #[error("layer sequence is empty")]
    EmptySequence,
}

/// Rendering seam toward the map toolkit.
///
/// The cursor expresses all its side effects through this trait as plain
/// show/hide signals and holds no rendering state itself. Implementations
/// are expected to be cheap and infallible; a real map binding would
/// translate these into overlay add/remove calls.
pub trait MapSurface {
    /// Places the layer's image on the map at its bounds.
    fn show_overlay(&mut self, layer: &LayerDescriptor, opacity: f64);

    /// Removes the layer's image from the map.
    fn hide_overlay(&mut self, layer: &LayerDescriptor);

    /// Adjusts the opacity of an already-visible layer.
    fn set_overlay_opacity(&mut self, layer: &LayerDescriptor, opacity: f64);
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// A show/hide signal observed by the recording surface.
    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceSignal {
        Show { date: NaiveDate, opacity: f64 },
        Hide { date: NaiveDate },
        Opacity { date: NaiveDate, opacity: f64 },
    }

    /// Map surface double that records every signal for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub signals: Vec<SurfaceSignal>,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self::default()
        }

        /// Dates currently visible according to the signal history.
        pub fn visible_dates(&self) -> Vec<NaiveDate> {
            let mut visible = Vec::new();
            for signal in &self.signals {
                match signal {
                    SurfaceSignal::Show { date, .. } => visible.push(*date),
                    SurfaceSignal::Hide { date } => visible.retain(|d| d != date),
                    SurfaceSignal::Opacity { .. } => {}
                }
            }
            visible
        }
    }

    impl MapSurface for RecordingSurface {
        fn show_overlay(&mut self, layer: &LayerDescriptor, opacity: f64) {
            self.signals.push(SurfaceSignal::Show {
                date: layer.date,
                opacity,
            });
        }

        fn hide_overlay(&mut self, layer: &LayerDescriptor) {
            self.signals.push(SurfaceSignal::Hide { date: layer.date });
        }

        fn set_overlay_opacity(&mut self, layer: &LayerDescriptor, opacity: f64) {
            self.signals.push(SurfaceSignal::Opacity {
                date: layer.date,
                opacity,
            });
        }
    }
}
