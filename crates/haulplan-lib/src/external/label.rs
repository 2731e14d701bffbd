use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

static STATE_ABBR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("Alabama", "AL"),
        ("Alaska", "AK"),
        ("Arizona", "AZ"),
        ("Arkansas", "AR"),
        ("California", "CA"),
        ("Colorado", "CO"),
        ("Connecticut", "CT"),
        ("Delaware", "DE"),
        ("Florida", "FL"),
        ("Georgia", "GA"),
        ("Hawaii", "HI"),
        ("Idaho", "ID"),
        ("Illinois", "IL"),
        ("Indiana", "IN"),
        ("Iowa", "IA"),
        ("Kansas", "KS"),
        ("Kentucky", "KY"),
        ("Louisiana", "LA"),
        ("Maine", "ME"),
        ("Maryland", "MD"),
        ("Massachusetts", "MA"),
        ("Michigan", "MI"),
        ("Minnesota", "MN"),
        ("Mississippi", "MS"),
        ("Missouri", "MO"),
        ("Montana", "MT"),
        ("Nebraska", "NE"),
        ("Nevada", "NV"),
        ("New Hampshire", "NH"),
        ("New Jersey", "NJ"),
        ("New Mexico", "NM"),
        ("New York", "NY"),
        ("North Carolina", "NC"),
        ("North Dakota", "ND"),
        ("Ohio", "OH"),
        ("Oklahoma", "OK"),
        ("Oregon", "OR"),
        ("Pennsylvania", "PA"),
        ("Rhode Island", "RI"),
        ("South Carolina", "SC"),
        ("South Dakota", "SD"),
        ("Tennessee", "TN"),
        ("Texas", "TX"),
        ("Utah", "UT"),
        ("Vermont", "VT"),
        ("Virginia", "VA"),
        ("Washington", "WA"),
        ("West Virginia", "WV"),
        ("Wisconsin", "WI"),
        ("Wyoming", "WY"),
    ]
    .into_iter()
    .collect()
});

/// Two-letter postal abbreviation for a full US state name.
pub fn state_abbreviation(state: &str) -> Option<&'static str> {
    STATE_ABBR.get(state.trim()).copied()
}

/// Structured address parts returned by the geocoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressParts {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub hamlet: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl AddressParts {
    /// Short `"City, ST"` label, degrading to whichever part is available.
    pub fn label(&self, display_name: &str) -> String {
        let head = display_name.split(',').next().unwrap_or_default().trim();
        let city = [&self.city, &self.town, &self.village, &self.hamlet]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(head);
        let state = self.state.as_deref().and_then(state_abbreviation);

        match (city.is_empty(), state) {
            (false, Some(st)) => format!("{city}, {st}"),
            (false, None) => city.to_string(),
            (true, Some(st)) => st.to_string(),
            (true, None) => head.to_string(),
        }
    }
}
