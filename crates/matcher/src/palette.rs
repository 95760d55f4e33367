//! Display colours assigned to candidates by submission position.

use serde::{Deserialize, Serialize};

/// Named highlight colour, `#RRGGBBAA`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DisplayColor {
    pub name: String,
    pub hex: String,
}

impl DisplayColor {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hex: hex.into(),
        }
    }
}

pub const PALETTE: [(&str, &str); 45] = [
    ("Seafoam", "#71EEB8AA"),
    ("Powder Blue", "#B0E0E6AA"),
    ("Lavender", "#E6E6FAAA"),
    ("Tangerine", "#F28500AA"),
    ("Mint Green", "#98FB98AA"),
    ("Baby Blue", "#89CFFAAA"),
    ("Light Pink", "#FFB6C1AA"),
    ("Light Teal", "#8FDBDCAA"),
    ("Azure", "#F0FFFFAA"),
    ("Orchid", "#DA70D6AA"),
    ("Champagne", "#F7E7CEAA"),
    ("Coral", "#FF7F50AA"),
    ("Pale Yellow", "#FFFF99AA"),
    ("Neon Yellow", "#DFFF00AA"),
    ("Sky Blue", "#87CEEBAA"),
    ("Ecru", "#CCC5A3AA"),
    ("Light Green", "#90EE90AA"),
    ("Peach", "#FFDAB9AA"),
    ("Light Lime", "#CCFF00AA"),
    ("Pale Teal", "#80CBC4AA"),
    ("Spring Green", "#00FF7FAA"),
    ("Magenta", "#FF00FFAA"),
    ("Light Orange", "#FFA500AA"),
    ("Mauve", "#E0B0FFAA"),
    ("Fuchsia", "#FF77FFAA"),
    ("Thistle", "#D8BFD8AA"),
    ("Salmon", "#FFA07AAA"),
    ("Chartreuse", "#DFFF4FAA"),
    ("Light Red", "#FFCCCCAA"),
    ("Canary", "#FFEF00AA"),
    ("Yellow", "#FFFF00AA"),
    ("Lime", "#BFFF00AA"),
    ("Periwinkle", "#CCCCFFAA"),
    ("Pale Green", "#98FB98AA"),
    ("Bubblegum", "#FFC1CCAA"),
    ("Ivory", "#FFFFF0AA"),
    ("Violet", "#EE82EEAA"),
    ("Apricot", "#FBCEB1AA"),
    ("Melon", "#FDBCB4AA"),
    ("Turquoise", "#40E0D0AA"),
    ("Rose", "#FF007FAA"),
    ("Pale Yellow", "#FFFACDAA"),
    ("Light Purple", "#D8BFD8AA"),
    ("Amethyst", "#9966CCAA"),
    ("Cornflower Blue", "#6495EDAA"),
];

/// Colour for the candidate at submission position `index`; wraps after 45.
pub fn color_for(index: usize) -> DisplayColor {
    let (name, hex) = PALETTE[index % PALETTE.len()];
    DisplayColor::new(name, hex)
}
