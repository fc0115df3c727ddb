use std::collections::HashMap;

pub const DEFAULT_SCHEME: &str = "leaflet_default";

/// Yellow to magenta shades used when no sequential scheme is chosen
pub const DEFAULT_PALETTE: &[&str] = &[
    "#F7BC07", "#F0A520", "#EA8E39", "#E27752", "#DB606B", "#D44984", "#CE329D", "#B52A8E",
    "#9D237E", "#C60076",
];

const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

const GREENS: &[&str] = &[
    "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#006d2c",
    "#00441b",
];

const ORANGES: &[&str] = &[
    "#fff5eb", "#fee6ce", "#fdd0a2", "#fdae6b", "#fd8d3c", "#f16913", "#d94801", "#a63603",
    "#7f2704",
];

const REDS: &[&str] = &[
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
    "#67000d",
];

const PURPLES: &[&str] = &[
    "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3", "#54278f",
    "#3f007d",
];

lazy_static! {
    static ref SEQUENTIAL_SCHEMES: HashMap<&'static str, &'static [&'static str]> = vec![
        (DEFAULT_SCHEME, DEFAULT_PALETTE),
        ("blues", BLUES),
        ("greens", GREENS),
        ("oranges", ORANGES),
        ("reds", REDS),
        ("purples", PURPLES),
    ]
    .into_iter()
    .collect();
}

/// Colors of a named sequential scheme
pub fn sequential_scheme(name: &str) -> Option<&'static [&'static str]> {
    SEQUENTIAL_SCHEMES.get(name).copied()
}

/// Names of the registered sequential schemes, sorted
pub fn scheme_names() -> Vec<&'static str> {
    let mut names: Vec<_> = SEQUENTIAL_SCHEMES.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Palette for a chart. Missing or unknown scheme names fall back to the default shades.
pub fn resolve_palette(name: Option<&str>) -> Vec<String> {
    let colors = match name.filter(|n| !n.is_empty()) {
        None => DEFAULT_PALETTE,
        Some(name) => sequential_scheme(name).unwrap_or_else(|| {
            log::warn!("Unknown color scheme {name:?}, falling back to {DEFAULT_SCHEME}");
            DEFAULT_PALETTE
        }),
    };
    colors.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_palette() {
        assert_eq!(resolve_palette(None).len(), 10);
        assert_eq!(resolve_palette(Some("")), resolve_palette(None));
        assert_eq!(resolve_palette(Some("blues"))[0], "#f7fbff");
        assert_eq!(resolve_palette(Some("no_such_scheme"))[9], "#C60076");
    }

    #[test]
    fn test_scheme_names() {
        let names = scheme_names();
        assert!(names.contains(&DEFAULT_SCHEME));
        assert_eq!(names.len(), 6);
    }
}
