//! AQI severity categories

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bounds (inclusive) of every category but the last, ascending.
pub const BREAKPOINTS: [f64; 5] = [50.0, 100.0, 200.0, 300.0, 400.0];

/// Severity band of an AQI value, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// AQI up to 50
    Good,
    /// Above 50, up to 100
    Satisfactory,
    /// Above 100, up to 200
    Moderate,
    /// Above 200, up to 300
    Poor,
    /// Above 300, up to 400
    #[serde(rename = "Very Poor")]
    VeryPoor,
    /// Above 400
    Severe,
}

impl Category {
    /// All categories, ascending
    pub const ALL: [Category; 6] = [
        Category::Good,
        Category::Satisfactory,
        Category::Moderate,
        Category::Poor,
        Category::VeryPoor,
        Category::Severe,
    ];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Satisfactory => "Satisfactory",
            Category::Moderate => "Moderate",
            Category::Poor => "Poor",
            Category::VeryPoor => "Very Poor",
            Category::Severe => "Severe",
        }
    }

    /// Foreground color for gauges and labels (hex)
    pub fn color(self) -> &'static str {
        match self {
            Category::Good => "#2ECC71",
            Category::Satisfactory => "#27AE60",
            Category::Moderate => "#F1C40F",
            Category::Poor => "#E67E22",
            Category::VeryPoor => "#C0392B",
            Category::Severe => "#6C3483",
        }
    }

    /// Background color for cards and gauge steps (hex)
    pub fn background_color(self) -> &'static str {
        match self {
            Category::Good => "#ABEBC6",
            Category::Satisfactory => "#D5F5E3",
            Category::Moderate => "#F9E79F",
            Category::Poor => "#F5B7B1",
            Category::VeryPoor => "#D98880",
            Category::Severe => "#BB8FCE",
        }
    }

    /// Exclusive lower and inclusive upper AQI bound of this band.
    ///
    /// `Good` starts at negative infinity and `Severe` has no upper bound.
    pub fn range(self) -> (f64, f64) {
        let idx = self as usize;
        let lower = if idx == 0 {
            f64::NEG_INFINITY
        } else {
            BREAKPOINTS[idx - 1]
        };
        let upper = BREAKPOINTS.get(idx).copied().unwrap_or(f64::INFINITY);
        (lower, upper)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_severity() {
        assert!(Category::Good < Category::Satisfactory);
        assert!(Category::Poor < Category::VeryPoor);
        assert!(Category::VeryPoor < Category::Severe);
        assert_eq!(Category::ALL.iter().max(), Some(&Category::Severe));
    }

    #[test]
    fn test_ranges_are_contiguous() {
        for pair in Category::ALL.windows(2) {
            assert_eq!(pair[0].range().1, pair[1].range().0);
        }
        assert_eq!(Category::Good.range().0, f64::NEG_INFINITY);
        assert_eq!(Category::Severe.range(), (400.0, f64::INFINITY));
    }

    #[test]
    fn test_serde_uses_display_labels() {
        let json = serde_json::to_string(&Category::VeryPoor).unwrap();
        assert_eq!(json, "\"Very Poor\"");

        let parsed: Category = serde_json::from_str("\"Satisfactory\"").unwrap();
        assert_eq!(parsed, Category::Satisfactory);
    }
}
