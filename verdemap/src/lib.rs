//! Verdemap - NDVI time-series monitoring for drawn areas of interest
//!
//! This library provides the interaction core of a vegetation-index
//! monitoring tool: a user draws an area on a map, requests an NDVI time
//! series over a date range, and inspects the resulting per-date raster
//! layers and summary chart.
//!
//! The crate owns admission control (area and date checks that run before
//! any network call) and the request-lifecycle state machine, including
//! cancellation-safe layer swapping. The map toolkit, the chart library,
//! and the NDVI computation service are external collaborators reached
//! through the [`overlay::MapSurface`], [`session::ChartSink`], and
//! [`ndvi::NdviClient`] seams.

pub mod admission;
pub mod aoi;
pub mod app;
pub mod ndvi;
pub mod overlay;
pub mod session;
