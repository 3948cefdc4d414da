//! County demographic record model
//!
//! A record carries a county/state identity, a `population` group guaranteed
//! to hold the `"2014 Total Population"` count, and any number of additional
//! attribute groups (`Education`, `Income`, ...) whose values are
//! percentages of the total population.

use serde::Deserialize;
use std::collections::BTreeMap;

pub mod loader;
pub mod resolver;

pub use loader::load_counties;
pub use resolver::resolve_field;

/// Label within a group for the absolute population count.
pub const TOTAL_POPULATION: &str = "2014 Total Population";

/// One named statistic group: label -> numeric value.
pub type FieldGroup = BTreeMap<String, f64>;

/// Demographic data for a single U.S. county.
///
/// Records are never mutated after loading; filtering builds new vectors of
/// cloned records.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountyRecord {
    pub county: String,
    pub state: String,
    pub population: FieldGroup,
    /// All remaining top-level objects in the dataset entry, keyed by group
    /// name (e.g. `Education`, `Ethnicities`, `Income`).
    #[serde(flatten)]
    pub groups: BTreeMap<String, FieldGroup>,
}

impl CountyRecord {
    /// The county's `2014 Total Population` count, or 0 if the dataset
    /// violated the guarantee that the key is present.
    pub fn total_population(&self) -> f64 {
        self.population.get(TOTAL_POPULATION).copied().unwrap_or(0.0)
    }

    /// Look up an attribute group by name, ASCII-case-insensitively.
    /// `population` resolves like any other group name.
    pub fn group(&self, name: &str) -> Option<&FieldGroup> {
        if name.eq_ignore_ascii_case("population") {
            return Some(&self.population);
        }
        self.groups
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, group)| group)
    }
}
