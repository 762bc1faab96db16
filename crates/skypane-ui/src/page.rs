//! Named page regions the renderer writes into.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier of a region on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionId {
    LocationQuarry,
    SearchBtn,
    Temperature,
    Precipitation,
    Humidity,
    Wind,
    Location,
    Condition,
    ConditionIcon,
    LastUpdated,
}

impl RegionId {
    pub const ALL: [RegionId; 10] = [
        RegionId::LocationQuarry,
        RegionId::SearchBtn,
        RegionId::Temperature,
        RegionId::Precipitation,
        RegionId::Humidity,
        RegionId::Wind,
        RegionId::Location,
        RegionId::Condition,
        RegionId::ConditionIcon,
        RegionId::LastUpdated,
    ];

    /// Regions a successful render writes to.
    pub const DISPLAY: [RegionId; 8] = [
        RegionId::Temperature,
        RegionId::Precipitation,
        RegionId::Humidity,
        RegionId::Wind,
        RegionId::Location,
        RegionId::Condition,
        RegionId::ConditionIcon,
        RegionId::LastUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionId::LocationQuarry => "location-quarry",
            RegionId::SearchBtn => "search-btn",
            RegionId::Temperature => "temperature",
            RegionId::Precipitation => "precipitation",
            RegionId::Humidity => "humidity",
            RegionId::Wind => "wind",
            RegionId::Location => "location",
            RegionId::Condition => "condition",
            RegionId::ConditionIcon => "condition-icon",
            RegionId::LastUpdated => "last-updated",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == id)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a single region.
///
/// `text` is what a text region shows, `value` what an input holds; image
/// regions use `src`, `alt` and `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub text: String,
    pub value: String,
    pub src: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
    classes: BTreeSet<String>,
}

impl Region {
    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

/// An already-loaded page the renderer can look regions up in.
pub trait Page: Send {
    fn region(&self, id: RegionId) -> Option<&Region>;

    fn region_mut(&mut self, id: RegionId) -> Option<&mut Region>;
}

/// In-memory page, the backing store for the terminal view and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryPage {
    regions: BTreeMap<RegionId, Region>,
}

impl MemoryPage {
    /// Page with every region present and empty
    pub fn new() -> Self {
        Self {
            regions: RegionId::ALL
                .into_iter()
                .map(|id| (id, Region::default()))
                .collect(),
        }
    }

    /// Page with no regions at all
    pub fn empty() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    pub fn with_region(mut self, id: RegionId) -> Self {
        self.regions.entry(id).or_default();
        self
    }

    pub fn without_region(mut self, id: RegionId) -> Self {
        self.regions.remove(&id);
        self
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions.iter().map(|(id, region)| (*id, region))
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for MemoryPage {
    fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_ids_round_trip() {
        for id in RegionId::ALL {
            assert_eq!(RegionId::from_id(id.as_str()), Some(id));
        }
        assert_eq!(RegionId::from_id("nope"), None);
    }

    #[test]
    fn test_display_regions_exclude_inputs() {
        assert!(!RegionId::DISPLAY.contains(&RegionId::LocationQuarry));
        assert!(!RegionId::DISPLAY.contains(&RegionId::SearchBtn));
    }

    #[test]
    fn test_region_classes() {
        let mut region = Region::default();
        region.add_class("error");
        region.add_class("error");
        assert!(region.has_class("error"));
        assert_eq!(region.classes().count(), 1);
        region.remove_class("error");
        assert!(!region.has_class("error"));
    }

    #[test]
    fn test_memory_page_builders() {
        let page = MemoryPage::new().without_region(RegionId::Wind);
        assert!(page.region(RegionId::Wind).is_none());
        assert!(page.region(RegionId::Humidity).is_some());

        let page = MemoryPage::empty().with_region(RegionId::Wind);
        assert_eq!(page.regions().count(), 1);
    }
}
