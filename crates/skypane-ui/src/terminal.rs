//! Plain-text view of a page, used by the binary to show what the
//! renderer wrote.

use crate::page::{Page, RegionId};

/// One line per region present on the page, with any classes appended in
/// brackets. The search button has no content and is skipped.
pub fn draw<P: Page + ?Sized>(page: &P) -> String {
    let mut out = String::new();

    for id in RegionId::ALL {
        let Some(region) = page.region(id) else {
            continue;
        };

        let body = match id {
            RegionId::SearchBtn => continue,
            RegionId::LocationQuarry => format!("> {}", region.value),
            RegionId::ConditionIcon => region.src.clone().unwrap_or_default(),
            _ => region.text.clone(),
        };

        let classes: Vec<&str> = region.classes().collect();
        if classes.is_empty() {
            out.push_str(&format!("{:>15}  {}\n", id.as_str(), body));
        } else {
            out.push_str(&format!(
                "{:>15}  {}  [{}]\n",
                id.as_str(),
                body,
                classes.join(" ")
            ));
        }
    }

    out
}
