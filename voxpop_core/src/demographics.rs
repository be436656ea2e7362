//! Built-in demographic tables for persona generation.
//!
//! One profile serves both factory modes: the region table carries
//! absolute resident populations, so it can be sampled directly
//! (demographic mode) or fed through the allocator for an exact
//! region-proportional headcount (population mode).

use crate::distribution::CategoryDistribution;
use serde::{Deserialize, Serialize};

/// Political-leaning label for respondents with no stated interest.
/// The simulated provider short-circuits these to "no strong opinion"
/// responses.
pub const DISENGAGED: &str = "Disengaged";

/// Respondents at or below this age always get the student occupation,
/// overriding the weighted draw.
pub const STUDENT_AGE_CUTOFF: u32 = 20;

/// An inclusive age bracket with a population weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgeBracket {
    /// Inclusive lower bound
    pub min: u32,

    /// Inclusive upper bound
    pub max: u32,

    /// Relative population weight (percent share)
    pub weight: f64,
}

impl AgeBracket {
    /// Creates a bracket.
    pub fn new(min: u32, max: u32, weight: f64) -> Self {
        Self { min, max, weight }
    }
}

/// Generation cohort, a pure step function of age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Generation {
    /// Age 0–24
    GenZ,
    /// Age 25–39
    Millennial,
    /// Age 40–54
    GenX,
    /// Age 55–64
    Bubble,
    /// Age 65 and up
    Senior,
}

impl Generation {
    /// Maps an age to its cohort. Boundaries are fixed and
    /// non-overlapping; two personas with the same age always get the
    /// same label.
    pub fn from_age(age: u32) -> Self {
        if age <= 24 {
            Generation::GenZ
        } else if age <= 39 {
            Generation::Millennial
        } else if age <= 54 {
            Generation::GenX
        } else if age <= 64 {
            Generation::Bubble
        } else {
            Generation::Senior
        }
    }

    /// Human-readable cohort label.
    pub fn label(&self) -> &'static str {
        match self {
            Generation::GenZ => "Gen Z",
            Generation::Millennial => "Millennial",
            Generation::GenX => "Gen X",
            Generation::Bubble => "Bubble era",
            Generation::Senior => "Senior",
        }
    }

    /// All cohorts, youngest first.
    pub fn all() -> [Generation; 5] {
        [
            Generation::GenZ,
            Generation::Millennial,
            Generation::GenX,
            Generation::Bubble,
            Generation::Senior,
        ]
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The weighted tables and derived-rule constants a persona population
/// is generated from.
#[derive(Debug, Clone)]
pub struct DemographicProfile {
    /// Age brackets with population weights
    pub age_brackets: Vec<AgeBracket>,

    /// Region → absolute resident population
    pub region_populations: CategoryDistribution,

    /// Regions classified as urban; everything else is rural
    pub urban_regions: Vec<String>,

    /// Occupation shares (percent)
    pub occupations: CategoryDistribution,

    /// Education shares (percent)
    pub education: CategoryDistribution,

    /// Household income band shares (percent)
    pub income_bands: CategoryDistribution,

    /// Household composition shares (percent)
    pub households: CategoryDistribution,

    /// Baseline political-leaning shares (middle age bands)
    pub political_base: CategoryDistribution,

    /// Political-leaning shares for respondents aged 29 and below
    pub political_young: CategoryDistribution,

    /// Political-leaning shares for respondents aged 65 and up
    pub political_senior: CategoryDistribution,
}

impl DemographicProfile {
    /// National profile modeled on published Japanese statistics.
    pub fn japan() -> Self {
        Self {
            age_brackets: vec![
                AgeBracket::new(0, 14, 11.2),
                AgeBracket::new(15, 24, 9.8),
                AgeBracket::new(25, 34, 12.1),
                AgeBracket::new(35, 44, 14.2),
                AgeBracket::new(45, 54, 13.8),
                AgeBracket::new(55, 64, 13.9),
                AgeBracket::new(65, 74, 12.5),
                AgeBracket::new(75, 100, 16.8),
            ],
            region_populations: CategoryDistribution::from_pairs([
                ("Tokyo", 14.0e6),
                ("Kanagawa", 9.2e6),
                ("Osaka", 8.8e6),
                ("Aichi", 7.5e6),
                ("Saitama", 7.3e6),
                ("Chiba", 6.3e6),
                ("Hyogo", 5.4e6),
                ("Hokkaido", 5.1e6),
                ("Fukuoka", 5.1e6),
                ("Shizuoka", 3.6e6),
                ("Other regions", 50.9e6),
            ]),
            urban_regions: ["Tokyo", "Kanagawa", "Osaka", "Aichi", "Saitama", "Chiba"]
                .into_iter()
                .map(String::from)
                .collect(),
            occupations: CategoryDistribution::from_pairs([
                ("Office worker", 23.1),
                ("Engineer", 15.8),
                ("Service industry", 12.6),
                ("Sales", 11.0),
                ("Manufacturing", 13.9),
                ("Construction", 6.7),
                ("Civil servant", 3.2),
                ("Self-employed", 8.5),
                ("Student", 4.2),
                ("Retired / not employed", 12.8),
                ("Other", 14.7),
            ]),
            education: CategoryDistribution::from_pairs([
                ("Junior high school", 8.2),
                ("High school", 35.4),
                ("Vocational school", 18.7),
                ("Junior college", 9.1),
                ("University", 24.8),
                ("Graduate school", 3.8),
            ]),
            income_bands: CategoryDistribution::from_pairs([
                ("Under 2M JPY", 15.3),
                ("2-3M JPY", 18.7),
                ("3-4M JPY", 16.9),
                ("4-5M JPY", 14.2),
                ("5-6M JPY", 11.8),
                ("6-8M JPY", 12.4),
                ("8-10M JPY", 6.8),
                ("Over 10M JPY", 3.9),
            ]),
            households: CategoryDistribution::from_pairs([
                ("Single", 28.8),
                ("Couple only", 20.3),
                ("Two-generation family", 29.5),
                ("Three-generation family", 8.7),
                ("Single parent", 7.2),
                ("Other", 5.5),
            ]),
            political_base: CategoryDistribution::from_pairs([
                ("Conservative", 35.2),
                ("Moderate", 42.1),
                ("Liberal", 15.8),
                (DISENGAGED, 6.9),
            ]),
            political_young: CategoryDistribution::from_pairs([
                ("Conservative", 25.0),
                ("Moderate", 35.0),
                ("Liberal", 20.0),
                (DISENGAGED, 20.0),
            ]),
            political_senior: CategoryDistribution::from_pairs([
                ("Conservative", 50.0),
                ("Moderate", 35.0),
                ("Liberal", 12.0),
                (DISENGAGED, 3.0),
            ]),
        }
    }

    /// Political table for an age band: respondents 29 and under and 65
    /// and up carry their own distributions; everyone else uses the
    /// baseline.
    pub fn political_for_age(&self, age: u32) -> &CategoryDistribution {
        if age <= 29 {
            &self.political_young
        } else if age >= 65 {
            &self.political_senior
        } else {
            &self.political_base
        }
    }

    /// True when the region is on the urban allow-list.
    pub fn is_urban(&self, region: &str) -> bool {
        self.urban_regions.iter().any(|r| r == region)
    }
}
