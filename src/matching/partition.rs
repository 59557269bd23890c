use serde::Serialize;

use crate::core::color::ColorIdentity;
use crate::core::combo::ComboRecord;

/// Potential matches split by whether they fit the deck's colors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition<T> {
    /// Combo identity is a subset of the deck identity
    pub within: Vec<T>,
    /// Combo needs at least one color the deck does not have
    pub outside: Vec<T>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            within: Vec::new(),
            outside: Vec::new(),
        }
    }
}

/// Split `potential` into combos within and outside `deck_identity`.
///
/// Colorless combos are always within. Both halves keep input order.
pub fn partition<T, I>(potential: I, deck_identity: ColorIdentity) -> Partition<T>
where
    I: IntoIterator<Item = T>,
    T: AsRef<ComboRecord>,
{
    let (within, outside) = potential
        .into_iter()
        .partition(|item| item.as_ref().color_identity.is_subset_of(deck_identity));
    Partition { within, outside }
}

/// Keep the outside-identity entries whose identity fits `selected`
pub fn filter_outside<T, I>(outside: I, selected: ColorIdentity) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: AsRef<ComboRecord>,
{
    outside
        .into_iter()
        .filter(|item| item.as_ref().color_identity.is_subset_of(selected))
        .collect()
}

/// Starting selection for the outside-identity filter: every color
#[must_use]
pub const fn default_selection() -> ColorIdentity {
    ColorIdentity::ALL
}
