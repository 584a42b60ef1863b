use std::collections::{BTreeMap, BTreeSet};

/// Qualitative palette cyclically assigned to years (Set1). Chart layers key
/// every series off this map so a year keeps one color across all views.
pub const PALETTE: [&str; 9] = [
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
    "#999999",
];

pub type YearColorMap = BTreeMap<i32, &'static str>;

/// Assign each distinct year a palette color.
///
/// Years are sorted ascending before assignment, so the result depends only
/// on the set of years, not on iteration order or call history. When there
/// are more years than palette entries the colors wrap.
pub fn colors_for<I: IntoIterator<Item = i32>>(years: I) -> YearColorMap {
    let distinct: BTreeSet<i32> = years.into_iter().collect();
    distinct
        .into_iter()
        .enumerate()
        .map(|(idx, year)| (year, PALETTE[idx % PALETTE.len()]))
        .collect()
}
