//! Time-indexed layer display
//!
//! A completed session produces an ordered sequence of dated raster layers.
//! [`LayerCursor`] wraps that immutable sequence with the mutable view state
//! (which layer is shown, at what opacity) and routes all rendering through
//! the [`MapSurface`] seam.
//!
//! Invariant: at most one overlay is visible at any time. Every show signal
//! for a new layer is preceded by a hide signal for the previous one, so a
//! map toolkit never composites stale layers.

mod types;

pub use types::{LayerDescriptor, MapSurface, OverlayError};

#[cfg(test)]
pub use types::tests::{RecordingSurface, SurfaceSignal};

use tracing::debug;

/// Initial overlay opacity after a cursor is built.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Cursor over an immutable chronological layer sequence.
///
/// The index starts at the last (most recent) layer. Index and opacity
/// mutations clamp rather than error, matching slider semantics.
#[derive(Debug)]
pub struct LayerCursor {
    layers: Vec<LayerDescriptor>,
    index: usize,
    opacity: f64,
    shown: bool,
}

impl LayerCursor {
    /// Builds a cursor over a non-empty layer sequence.
    ///
    /// The most recent layer is selected but nothing is shown until
    /// [`show_initial`](Self::show_initial) runs. Returns
    /// [`OverlayError::EmptySequence`] for zero layers; an empty result set
    /// is a distinct success-with-no-data case the caller handles without a
    /// cursor.
    pub fn new(layers: Vec<LayerDescriptor>) -> Result<Self, OverlayError> {
        if layers.is_empty() {
            return Err(OverlayError::EmptySequence);
        }
        let index = layers.len() - 1;
        Ok(Self {
            layers,
            index,
            opacity: DEFAULT_OPACITY,
            shown: false,
        })
    }

    /// Emits the first show signal for the selected layer.
    pub fn show_initial<S: MapSurface>(&mut self, surface: &mut S) {
        if !self.shown {
            surface.show_overlay(&self.layers[self.index], self.opacity);
            self.shown = true;
        }
    }

    /// Selects the layer at `index`, clamped to the sequence.
    ///
    /// Hides the previously visible layer before showing the new one, so
    /// exactly one overlay stays visible. A clamped-to-same index is a
    /// no-op and emits no signals.
    pub fn set_index<S: MapSurface>(&mut self, index: i64, surface: &mut S) {
        let clamped = index.clamp(0, self.layers.len() as i64 - 1) as usize;
        if clamped == self.index && self.shown {
            return;
        }

        if self.shown {
            surface.hide_overlay(&self.layers[self.index]);
        }
        self.index = clamped;
        surface.show_overlay(&self.layers[self.index], self.opacity);
        self.shown = true;

        debug!(index = self.index, date = %self.layers[self.index].date, "Layer selected");
    }

    /// Sets the opacity of the visible layer, clamped to `[0, 1]`.
    ///
    /// Does not change which layer is visible.
    pub fn set_opacity<S: MapSurface>(&mut self, opacity: f64, surface: &mut S) {
        self.opacity = opacity.clamp(0.0, 1.0);
        if self.shown {
            surface.set_overlay_opacity(&self.layers[self.index], self.opacity);
        }
    }

    /// Hides the visible layer, if any. Used when a session's results are
    /// torn down before a new submission.
    pub fn hide<S: MapSurface>(&mut self, surface: &mut S) {
        if self.shown {
            surface.hide_overlay(&self.layers[self.index]);
            self.shown = false;
        }
    }

    /// The currently selected descriptor.
    pub fn current(&self) -> &LayerDescriptor {
        &self.layers[self.index]
    }

    /// The full chronological sequence.
    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    /// The selected index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current opacity.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Number of layers in the sequence.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false; construction rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
