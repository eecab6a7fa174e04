// ABOUTME: Trigger category taxonomy shared by tagging, analysis, and presentation
// ABOUTME: Single lookup table mapping category id to display name, synonyms, and icon
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Food category that can be associated with digestive symptoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    /// Milk, cheese, cream, yogurt
    Dairy,
    /// Wheat, barley, rye
    Gluten,
    /// Beans, lentils, chickpeas
    Beans,
    /// Broccoli, cabbage, cauliflower, sprouts
    Cruciferous,
    /// Onion, garlic, leek, shallot
    OnionGarlic,
    /// Apples, pears, mango, watermelon and other high-FODMAP fruit
    HighFodmapFruit,
    /// Sorbitol, xylitol, sucralose and similar sweeteners
    ArtificialSweeteners,
    /// Sparkling water, soda, beer foam
    Carbonation,
    /// Deep-fried and high-fat foods
    FriedFatty,
    /// Chili, hot sauce, pepper-heavy dishes
    Spicy,
    /// Beer, wine, spirits
    Alcohol,
    /// Coffee, energy drinks, strong tea
    Caffeine,
    /// Sausages, bacon, deli meats
    ProcessedMeat,
    /// Sweets, pastries, added sugar
    RefinedSugar,
}

/// Presentation and tagging metadata for one category
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    /// Stable identifier used in records and persisted state
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Alternative spellings the upstream tagger may emit
    pub synonyms: &'static [&'static str],
    /// Emoji icon for presentation layers
    pub icon: &'static str,
}

impl TriggerCategory {
    /// Every known category, in declaration order
    pub const ALL: [Self; 14] = [
        Self::Dairy,
        Self::Gluten,
        Self::Beans,
        Self::Cruciferous,
        Self::OnionGarlic,
        Self::HighFodmapFruit,
        Self::ArtificialSweeteners,
        Self::Carbonation,
        Self::FriedFatty,
        Self::Spicy,
        Self::Alcohol,
        Self::Caffeine,
        Self::ProcessedMeat,
        Self::RefinedSugar,
    ];

    /// Lookup table entry for this category
    #[must_use]
    pub const fn info(self) -> CategoryInfo {
        match self {
            Self::Dairy => CategoryInfo {
                id: "dairy",
                display_name: "Dairy",
                synonyms: &["lactose", "milk", "cheese"],
                icon: "🥛",
            },
            Self::Gluten => CategoryInfo {
                id: "gluten",
                display_name: "Gluten",
                synonyms: &["wheat", "grains"],
                icon: "🌾",
            },
            Self::Beans => CategoryInfo {
                id: "beans",
                display_name: "Beans & Legumes",
                synonyms: &["legumes", "lentils", "pulses"],
                icon: "🫘",
            },
            Self::Cruciferous => CategoryInfo {
                id: "cruciferous",
                display_name: "Cruciferous Vegetables",
                synonyms: &["brassicas", "cruciferous_vegetables"],
                icon: "🥦",
            },
            Self::OnionGarlic => CategoryInfo {
                id: "onion_garlic",
                display_name: "Onion & Garlic",
                synonyms: &["onion", "garlic", "alliums", "fructans"],
                icon: "🧅",
            },
            Self::HighFodmapFruit => CategoryInfo {
                id: "high_fodmap_fruit",
                display_name: "High-FODMAP Fruit",
                synonyms: &["fodmap_fruit", "fruit", "fructose", "high_fodmap"],
                icon: "🍎",
            },
            Self::ArtificialSweeteners => CategoryInfo {
                id: "artificial_sweeteners",
                display_name: "Artificial Sweeteners",
                synonyms: &["sweeteners", "sugar_alcohols", "polyols"],
                icon: "🍬",
            },
            Self::Carbonation => CategoryInfo {
                id: "carbonation",
                display_name: "Carbonated Drinks",
                synonyms: &["carbonated", "fizzy_drinks", "soda"],
                icon: "🥤",
            },
            Self::FriedFatty => CategoryInfo {
                id: "fried_fatty",
                display_name: "Fried & Fatty Foods",
                synonyms: &["fried", "fatty", "high_fat"],
                icon: "🍟",
            },
            Self::Spicy => CategoryInfo {
                id: "spicy",
                display_name: "Spicy Foods",
                synonyms: &["chili", "hot_spices"],
                icon: "🌶️",
            },
            Self::Alcohol => CategoryInfo {
                id: "alcohol",
                display_name: "Alcohol",
                synonyms: &["beer", "wine"],
                icon: "🍷",
            },
            Self::Caffeine => CategoryInfo {
                id: "caffeine",
                display_name: "Caffeine",
                synonyms: &["coffee", "energy_drinks"],
                icon: "☕",
            },
            Self::ProcessedMeat => CategoryInfo {
                id: "processed_meat",
                display_name: "Processed Meat",
                synonyms: &["processed_meats", "cured_meat"],
                icon: "🥓",
            },
            Self::RefinedSugar => CategoryInfo {
                id: "refined_sugar",
                display_name: "Refined Sugar",
                synonyms: &["sugar", "sweets", "added_sugar"],
                icon: "🍩",
            },
        }
    }

    /// Stable identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        self.info().id
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        self.info().display_name
    }

    /// Emoji icon
    #[must_use]
    pub const fn icon(self) -> &'static str {
        self.info().icon
    }

    /// Resolve a raw tag emitted by the ingredient tagger
    ///
    /// Matching ignores case, surrounding whitespace, and treats spaces,
    /// hyphens, and `&` as underscores. Returns `None` for unknown tags.
    #[must_use]
    pub fn resolve(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|category| {
            let info = category.info();
            info.id == normalized || info.synonyms.iter().any(|s| *s == normalized)
        })
    }
}

fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep && !out.is_empty() {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out.replace("_and_", "_")
}

impl fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a string names no known category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trigger category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for TriggerCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}
