//! Persona records and the factory that composes them.

use crate::allocator::PopulationAllocator;
use crate::demographics::{DemographicProfile, Generation, STUDENT_AGE_CUTOFF};
use crate::distribution::WeightedSampler;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Urban/rural classification, derived from the region allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    Urban,
    Rural,
}

impl Locale {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Locale::Urban => "urban",
            Locale::Rural => "rural",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One synthetic survey respondent.
///
/// Created once by [`PersonaFactory`], never mutated, held in an ordered
/// list for the lifetime of one survey session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Sequential id, assigned from 1
    pub id: u64,

    /// Age in years, drawn uniformly within a weighted-selected bracket
    pub age: u32,

    /// Gender, drawn uniformly
    pub gender: String,

    /// Region of residence
    pub region: String,

    /// Occupation (forced to student below the age cutoff)
    pub occupation: String,

    /// Highest education level
    pub education: String,

    /// Household income band
    pub income_band: String,

    /// Household composition
    pub household: String,

    /// Political leaning, drawn from the age-conditioned table
    pub political_leaning: String,

    /// Urban/rural classification derived from region
    pub locale: Locale,

    /// Generation cohort derived from age
    pub generation: Generation,
}

/// Composes personas from independent weighted draws plus deterministic
/// derived rules.
///
/// Two modes:
/// - demographic mode ([`generate`](Self::generate)): every attribute is
///   drawn from the profile tables, region included;
/// - population mode ([`generate_population`](Self::generate_population)):
///   regions are fixed upstream by a population-proportional allocation
///   and only the remaining attributes are drawn.
pub struct PersonaFactory {
    profile: DemographicProfile,
    sampler: WeightedSampler,
}

const GENDERS: [&str; 2] = ["Male", "Female"];

impl PersonaFactory {
    /// Creates a factory over a profile, seeded for reproducibility.
    pub fn new(profile: DemographicProfile, seed: u64) -> Self {
        Self {
            profile,
            sampler: WeightedSampler::new(seed),
        }
    }

    /// The profile this factory draws from.
    pub fn profile(&self) -> &DemographicProfile {
        &self.profile
    }

    /// Demographic mode: draws every attribute, region included.
    pub fn generate(&mut self, id: u64) -> Result<Persona, CoreError> {
        let region = self
            .sampler
            .sample(&self.profile.region_populations)?
            .to_string();
        self.generate_in_region(id, &region)
    }

    /// Population mode for one persona: the region was selected upstream;
    /// everything else is drawn or derived.
    pub fn generate_in_region(&mut self, id: u64, region: &str) -> Result<Persona, CoreError> {
        let age = self.draw_age()?;
        let generation = Generation::from_age(age);

        // Respondents still in school keep a fixed occupation.
        let occupation = if age <= STUDENT_AGE_CUTOFF {
            "Student".to_string()
        } else {
            self.sampler.sample(&self.profile.occupations)?.to_string()
        };

        let political_leaning = {
            let table = self.profile.political_for_age(age);
            self.sampler.sample(table)?.to_string()
        };

        let locale = if self.profile.is_urban(region) {
            Locale::Urban
        } else {
            Locale::Rural
        };

        Ok(Persona {
            id,
            age,
            gender: (*self.sampler.choose(&GENDERS)?).to_string(),
            region: region.to_string(),
            occupation,
            education: self.sampler.sample(&self.profile.education)?.to_string(),
            income_band: self.sampler.sample(&self.profile.income_bands)?.to_string(),
            household: self.sampler.sample(&self.profile.households)?.to_string(),
            political_leaning,
            locale,
            generation,
        })
    }

    /// Generates `total` personas in demographic mode, ids 1..=total.
    pub fn generate_batch(&mut self, total: usize) -> Result<Vec<Persona>, CoreError> {
        (1..=total as u64).map(|id| self.generate(id)).collect()
    }

    /// Generates `total` personas in population mode: regions are
    /// allocated proportionally to resident population, then each
    /// region's quota is filled. Ids are sequential from 1 in
    /// allocation order.
    pub fn generate_population(&mut self, total: usize) -> Result<Vec<Persona>, CoreError> {
        let allocation =
            PopulationAllocator::allocate(&self.profile.region_populations, total)?;

        let quotas: Vec<(String, usize)> = allocation
            .counts()
            .map(|(l, c)| (l.to_string(), c))
            .collect();

        let mut personas = Vec::with_capacity(total);
        let mut id = 1u64;
        for (region, count) in quotas {
            for _ in 0..count {
                personas.push(self.generate_in_region(id, &region)?);
                id += 1;
            }
        }
        Ok(personas)
    }

    fn draw_age(&mut self) -> Result<u32, CoreError> {
        let weights: Vec<f64> = self.profile.age_brackets.iter().map(|b| b.weight).collect();
        let bracket = self.profile.age_brackets[self.sampler.sample_index(&weights)?];
        Ok(self.sampler.sample_range(bracket.min, bracket.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demographics::AgeBracket;
    use crate::distribution::CategoryDistribution;

    fn single_bracket_profile(min: u32, max: u32) -> DemographicProfile {
        let mut profile = DemographicProfile::japan();
        profile.age_brackets = vec![AgeBracket::new(min, max, 1.0)];
        profile
    }

    #[test]
    fn test_age_stays_in_selected_bracket() {
        let mut factory = PersonaFactory::new(single_bracket_profile(25, 34), 42);
        for id in 1..=100 {
            let persona = factory.generate(id).unwrap();
            assert!((25..=34).contains(&persona.age), "age {}", persona.age);
        }
    }

    #[test]
    fn test_generation_matches_age() {
        let mut factory = PersonaFactory::new(DemographicProfile::japan(), 7);
        for id in 1..=200 {
            let persona = factory.generate(id).unwrap();
            assert_eq!(persona.generation, Generation::from_age(persona.age));
        }
    }

    #[test]
    fn test_student_override_below_cutoff() {
        let mut factory = PersonaFactory::new(single_bracket_profile(0, 20), 11);
        for id in 1..=50 {
            let persona = factory.generate(id).unwrap();
            assert_eq!(persona.occupation, "Student");
        }
    }

    #[test]
    fn test_locale_follows_region() {
        let mut factory = PersonaFactory::new(DemographicProfile::japan(), 3);
        let urban = factory.generate_in_region(1, "Tokyo").unwrap();
        let rural = factory.generate_in_region(2, "Hokkaido").unwrap();
        assert_eq!(urban.locale, Locale::Urban);
        assert_eq!(rural.locale, Locale::Rural);
    }

    #[test]
    fn test_population_mode_ids_and_quotas() {
        let mut factory = PersonaFactory::new(DemographicProfile::japan(), 21);
        let personas = factory.generate_population(25).unwrap();

        assert_eq!(personas.len(), 25);
        for (i, persona) in personas.iter().enumerate() {
            assert_eq!(persona.id, i as u64 + 1);
        }

        // Region headcounts must match a fresh allocation over the same table.
        let allocation = PopulationAllocator::allocate(
            &DemographicProfile::japan().region_populations,
            25,
        )
        .unwrap();
        for (region, count) in allocation.counts() {
            let generated = personas.iter().filter(|p| p.region == region).count();
            assert_eq!(generated, count, "region {region}");
        }
    }

    #[test]
    fn test_same_seed_replays_population() {
        let mut f1 = PersonaFactory::new(DemographicProfile::japan(), 99);
        let mut f2 = PersonaFactory::new(DemographicProfile::japan(), 99);
        let p1 = f1.generate_population(10).unwrap();
        let p2 = f2.generate_population(10).unwrap();

        for (a, b) in p1.iter().zip(&p2) {
            assert_eq!(a.age, b.age);
            assert_eq!(a.region, b.region);
            assert_eq!(a.occupation, b.occupation);
            assert_eq!(a.political_leaning, b.political_leaning);
        }
    }

    #[test]
    fn test_political_young_band_only_uses_young_labels() {
        let mut profile = DemographicProfile::japan();
        profile.age_brackets = vec![AgeBracket::new(18, 29, 1.0)];
        profile.political_young =
            CategoryDistribution::from_pairs([("Liberal", 1.0)]);
        let mut factory = PersonaFactory::new(profile, 5);

        for id in 1..=30 {
            let persona = factory.generate(id).unwrap();
            assert_eq!(persona.political_leaning, "Liberal");
        }
    }
}
