//! Display layer for SkyPane.
//!
//! Renders `WeatherInfo` into named page regions and wires user triggers to
//! the fetch → extract → render pipeline.

pub mod controller;
pub mod error_mapping;
pub mod page;
pub mod render;
pub mod terminal;

pub use controller::{LookupError, LookupOutcome, Trigger, WeatherController};
pub use page::{MemoryPage, Page, Region, RegionId};
pub use render::{DisplayZone, RenderError, RenderState, Renderer};
