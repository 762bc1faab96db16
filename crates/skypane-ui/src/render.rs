//! Writes `WeatherInfo` into page regions and owns the unit toggle state.

use chrono::{DateTime, Local, TimeZone};
use chrono_tz::Tz;
use std::fmt;
use thiserror::Error;

use skypane_weather::{TemperatureUnit, WeatherInfo};

use crate::page::{Page, Region, RegionId};

/// `"Thursday, 12:00 AM"`
const LAST_UPDATED_FORMAT: &str = "%A, %-I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Page region not found: #{0}")]
    MissingRegion(RegionId),

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

/// Zone the last-updated time is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The viewer's local zone
    #[default]
    Local,
    Utc,
    Named(Tz),
}

impl DisplayZone {
    /// `None` means the local zone.
    pub fn from_name(name: Option<&str>) -> Result<Self, RenderError> {
        match name {
            None => Ok(Self::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| RenderError::UnknownTimeZone(name.to_string())),
        }
    }
}

/// What the renderer last put on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderState {
    pub unit: TemperatureUnit,
    pub info: Option<WeatherInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    zone: DisplayZone,
    state: RenderState,
}

impl Renderer {
    pub fn new(zone: DisplayZone) -> Self {
        Self {
            zone,
            state: RenderState::default(),
        }
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Write every display region for `info`.
    ///
    /// All display regions are checked before anything is written, so a
    /// missing region leaves the page untouched. The temperature starts out
    /// in Celsius on every render.
    pub fn render<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        info: WeatherInfo,
    ) -> Result<(), RenderError> {
        if let Some(missing) = RegionId::DISPLAY
            .into_iter()
            .find(|id| page.region(*id).is_none())
        {
            return Err(RenderError::MissingRegion(missing));
        }

        let last_updated = format_last_updated(info.last_updated_epoch, self.zone)?;
        let unit = TemperatureUnit::Celsius;

        region_mut(page, RegionId::Temperature)?.text = format_temperature(&info, unit);
        region_mut(page, RegionId::Precipitation)?.text =
            format!("Precipitation: {} mm", info.precip_mm);
        region_mut(page, RegionId::Humidity)?.text = format!("Humidity: {}%", info.humidity);
        region_mut(page, RegionId::Wind)?.text = format!("Wind: {} km/h", info.wind_kph);
        region_mut(page, RegionId::Location)?.text = info.city.clone();
        region_mut(page, RegionId::Condition)?.text = info.condition.text.clone();

        let icon = region_mut(page, RegionId::ConditionIcon)?;
        icon.src = Some(secure_icon_url(&info.condition.icon));
        icon.alt = Some(info.condition.text.clone());
        icon.title = Some(info.condition.text.clone());

        region_mut(page, RegionId::LastUpdated)?.text = last_updated;

        tracing::debug!("Rendered weather for {}", info.city);
        self.state = RenderState {
            unit,
            info: Some(info),
        };
        Ok(())
    }

    /// Flip the temperature region between Celsius and Fahrenheit.
    ///
    /// Returns the unit now shown, or `None` when nothing has been rendered.
    pub fn toggle_unit<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
    ) -> Result<Option<TemperatureUnit>, RenderError> {
        let Some(info) = &self.state.info else {
            return Ok(None);
        };

        let unit = self.state.unit.toggled();
        region_mut(page, RegionId::Temperature)?.text = format_temperature(info, unit);
        self.state.unit = unit;
        Ok(Some(unit))
    }
}

fn region_mut<P: Page + ?Sized>(page: &mut P, id: RegionId) -> Result<&mut Region, RenderError> {
    page.region_mut(id).ok_or(RenderError::MissingRegion(id))
}

/// `"20°C"` / `"68°F"`
pub fn format_temperature(info: &WeatherInfo, unit: TemperatureUnit) -> String {
    let value = match unit {
        TemperatureUnit::Celsius => info.temp_c,
        TemperatureUnit::Fahrenheit => info.temp_f,
    };
    format!("{}{}", value, unit.symbol())
}

/// Upgrade scheme-relative and plain-http icon URLs to https.
pub fn secure_icon_url(icon: &str) -> String {
    if let Some(rest) = icon.strip_prefix("//") {
        format!("https://{}", rest)
    } else if let Some(rest) = icon.strip_prefix("http://") {
        format!("https://{}", rest)
    } else {
        icon.to_string()
    }
}

/// Weekday and 12-hour time of `epoch` (seconds) in `zone`.
pub fn format_last_updated(epoch: i64, zone: DisplayZone) -> Result<String, RenderError> {
    let utc = DateTime::from_timestamp(epoch, 0).ok_or(RenderError::InvalidTimestamp(epoch))?;

    Ok(match zone {
        DisplayZone::Local => format_in(&utc.with_timezone(&Local)),
        DisplayZone::Utc => format_in(&utc),
        DisplayZone::Named(tz) => format_in(&utc.with_timezone(&tz)),
    })
}

fn format_in<Z: TimeZone>(time: &DateTime<Z>) -> String
where
    Z::Offset: fmt::Display,
{
    time.format(LAST_UPDATED_FORMAT).to_string()
}
