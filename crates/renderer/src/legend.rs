//! Manually constructed map legends.

use std::collections::HashSet;

use tract_common::CategoryScheme;

/// One colored swatch with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendPatch {
    /// Category value the patch stands for
    pub value: String,
    pub label: String,
    pub color: (u8, u8, u8, u8),
}

/// Legend title and patches in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub patches: Vec<LegendPatch>,
}

impl Legend {
    pub fn patch(&self, value: &str) -> Option<&LegendPatch> {
        self.patches.iter().find(|p| p.value == value)
    }
}

/// Build the legend for a scheme.
///
/// Every scheme entry gets a patch, in scheme order. Categories present in
/// the data but missing from the scheme follow in first-seen order, drawn in
/// the default color and labelled with their raw value.
pub fn build_legend<'a>(
    scheme: &CategoryScheme,
    present: impl IntoIterator<Item = &'a str>,
) -> Legend {
    let mut patches: Vec<LegendPatch> = scheme
        .entries
        .iter()
        .map(|e| LegendPatch {
            value: e.value.clone(),
            label: e.label.clone(),
            color: e.color.to_rgba(),
        })
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    for category in present {
        if scheme.contains(category) || !seen.insert(category) {
            continue;
        }
        patches.push(LegendPatch {
            value: category.to_string(),
            label: category.to_string(),
            color: scheme.default_color.to_rgba(),
        });
    }

    Legend {
        title: scheme.legend_title.clone(),
        patches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_entries_in_order() {
        let legend = build_legend(&CategoryScheme::opportunity(), ["2"]);
        assert_eq!(legend.title, "Opportunity Rankings");

        let labels: Vec<&str> = legend.patches.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["High Opportunity Area", "Medium Opportunity Area", "Low Opportunity Area"]
        );
        assert_eq!(legend.patch("1").map(|p| p.color), Some((46, 204, 113, 255)));
    }

    #[test]
    fn test_unmapped_category_gets_default_patch() {
        let legend = build_legend(&CategoryScheme::opportunity(), ["1", "7", "7", "9"]);
        assert_eq!(legend.patches.len(), 5);

        let extra = legend.patch("7").unwrap();
        assert_eq!(extra.label, "7");
        assert_eq!(extra.color, (255, 255, 255, 255));
        assert_eq!(legend.patches[4].value, "9");
    }
}
