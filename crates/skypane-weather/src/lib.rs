//! Weather service for SkyPane
//!
//! Fetches current conditions from WeatherAPI.com and projects the raw
//! payload down to the fields the display needs.

pub mod error;
pub mod extract;
pub mod location;
pub mod provider;
pub mod types;

pub use error::{ErrorKind, RemoteApiError, WeatherError};
pub use extract::extract;
pub use location::get_current_location;
pub use provider::{WeatherProvider, WeatherSource, DEFAULT_BASE_URL};
pub use types::*;
