//! City catalog
//!
//! Embeds a built-in Russian city list at build time and optionally merges
//! an external list on top of it. Lookups are case-insensitive; candidate
//! queries are indexed by first letter and keep catalog order.

use super::random::RandomSource;
use super::rules::{first_letter, fold, fold_char};
use crate::error::CatalogError;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Embedded city list, one name per line
static CITIES_DATA: &str = include_str!("../../data/cities.txt");

/// Built-in list used when no external list is available
static BUILTIN_CITIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    CITIES_DATA
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
});

/// Names the scripted opponent may pass off as real cities.
pub const FAKE_CITIES: [&str; 5] = [
    "Квантоград",
    "Нейросбург",
    "Киберполис",
    "Алгоритмск",
    "Датоград",
];

/// Immutable set of known cities plus the fake names. Built once at startup
/// and shared read-only by every game.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    /// Display names in catalog order
    names: Vec<String>,
    /// Folded name -> first position in `names`
    index: HashMap<String, usize>,
    /// First letter -> positions in `names`, in catalog order
    by_letter: HashMap<char, Vec<usize>>,
    /// Folded fake name -> display form
    fakes: HashMap<String, String>,
}

impl CityCatalog {
    /// Catalog over the embedded list only.
    pub fn builtin() -> Self {
        Self::from_names(BUILTIN_CITIES.iter().copied(), FAKE_CITIES)
    }

    /// Build a catalog from explicit names. Fake names that are also real
    /// cities are dropped from the fake set.
    pub fn from_names<I, S, F, T>(names: I, fakes: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(Into::<String>::into)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let mut index = HashMap::new();
        let mut by_letter: HashMap<char, Vec<usize>> = HashMap::new();
        for (pos, name) in names.iter().enumerate() {
            index.entry(fold(name)).or_insert(pos);
            if let Some(letter) = first_letter(name) {
                by_letter.entry(letter).or_default().push(pos);
            }
        }

        let fakes = fakes
            .into_iter()
            .map(Into::<String>::into)
            .filter(|fake| !index.contains_key(&fold(fake)))
            .map(|fake| (fold(&fake), fake))
            .collect();

        Self {
            names,
            index,
            by_letter,
            fakes,
        }
    }

    /// Load an external list and merge the built-in list into it.
    ///
    /// Blank lines are skipped. Duplicates are removed by exact string
    /// comparison, so names differing only in case both survive.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let external = data.lines().map(str::trim).filter(|line| !line.is_empty());
        let merged = merge_lists(external, BUILTIN_CITIES.iter().copied());
        info!(path = %path.display(), cities = merged.len(), "loaded city list");
        Ok(Self::from_names(merged, FAKE_CITIES))
    }

    /// Like [`CityCatalog::load`], but falls back to the built-in list when
    /// the file is missing or unreadable.
    pub fn load_or_builtin(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no external city list, using built-in");
            return Self::builtin();
        }
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "falling back to built-in city list");
                Self::builtin()
            }
        }
    }

    /// Display form of a known city.
    pub fn resolve_known(&self, name: &str) -> Option<&str> {
        self.index
            .get(&fold(name))
            .map(|&pos| self.names[pos].as_str())
    }

    /// Display form of a fake city.
    pub fn resolve_fake(&self, name: &str) -> Option<&str> {
        self.fakes.get(&fold(name)).map(String::as_str)
    }

    /// Display form of a known or fake city.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.resolve_known(name).or_else(|| self.resolve_fake(name))
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.index.contains_key(&fold(name))
    }

    pub fn is_fake(&self, name: &str) -> bool {
        self.fakes.contains_key(&fold(name))
    }

    /// Known cities starting with `letter`, in catalog order.
    pub fn starting_with(&self, letter: char) -> impl Iterator<Item = &str> + '_ {
        self.by_letter
            .get(&fold_char(letter))
            .into_iter()
            .flatten()
            .map(move |&pos| self.names[pos].as_str())
    }

    /// Pick one known city uniformly at random.
    pub fn random_city(&self, rng: &dyn RandomSource) -> Option<&str> {
        self.names
            .get(rng.below(self.names.len()))
            .map(String::as_str)
    }

    /// Number of known cities
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Concatenate two lists, keeping the first occurrence of each exact name.
fn merge_lists<'a, A, B>(first: A, second: B) -> Vec<String>
where
    A: Iterator<Item = &'a str>,
    B: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    first
        .chain(second)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::random::ScriptedRandom;
    use std::io::Write;

    #[test]
    fn test_builtin_contains_core_cities() {
        let catalog = CityCatalog::builtin();
        assert!(catalog.is_known("Москва"));
        assert!(catalog.is_known("астрахань"));
        assert!(catalog.is_known("  ПЕРМЬ "));
        assert!(catalog.len() > 250, "Expected 250+ cities, got {}", catalog.len());
    }

    #[test]
    fn test_resolve_returns_display_form() {
        let catalog = CityCatalog::builtin();
        assert_eq!(catalog.resolve("нижний новгород"), Some("Нижний Новгород"));
        assert_eq!(catalog.resolve("квантоград"), Some("Квантоград"));
        assert_eq!(catalog.resolve_known("Квантоград"), None);
        assert_eq!(catalog.resolve("Нетград"), None);
    }

    #[test]
    fn test_fakes_are_not_known() {
        let catalog = CityCatalog::builtin();
        for fake in FAKE_CITIES {
            assert!(catalog.is_fake(fake));
            assert!(!catalog.is_known(fake));
        }
    }

    #[test]
    fn test_fake_shadowed_by_real_city_is_dropped() {
        let catalog = CityCatalog::from_names(["Датоград"], ["Датоград", "Киберполис"]);
        assert!(catalog.is_known("Датоград"));
        assert!(!catalog.is_fake("Датоград"));
        assert!(catalog.is_fake("Киберполис"));
    }

    #[test]
    fn test_starting_with_keeps_catalog_order() {
        let catalog = CityCatalog::from_names(["Омск", "Москва", "Орёл", "Оренбург"], FAKE_CITIES);
        let found: Vec<&str> = catalog.starting_with('О').collect();
        assert_eq!(found, vec!["Омск", "Орёл", "Оренбург"]);
        assert_eq!(catalog.starting_with('щ').count(), 0);
    }

    #[test]
    fn test_merge_is_case_sensitive() {
        let merged = merge_lists(
            ["Москва", "москва", "Тула"].into_iter(),
            ["Тула", "Омск"].into_iter(),
        );
        assert_eq!(merged, vec!["Москва", "москва", "Тула", "Омск"]);

        // Both spellings survive the merge but resolve to the first one
        let catalog = CityCatalog::from_names(merged, FAKE_CITIES);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.resolve("МОСКВА"), Some("Москва"));
    }

    #[test]
    fn test_load_merges_external_with_builtin() {
        let path = std::env::temp_dir().join(format!("goroda-cities-{}.txt", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "Квантоград").unwrap();
            writeln!(file).unwrap();
            writeln!(file, "  Москва  ").unwrap();
            writeln!(file, "Зарайск").unwrap();
        }

        let catalog = CityCatalog::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        // External names come first
        assert_eq!(catalog.random_city(&ScriptedRandom::new()), Some("Квантоград"));
        assert!(catalog.is_known("Зарайск"));
        assert!(catalog.is_known("Ярославль"));
        // An external list can make a fake name real
        assert!(!catalog.is_fake("Квантоград"));
        assert_eq!(catalog.len(), BUILTIN_CITIES.len() + 2);
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let catalog = CityCatalog::load_or_builtin(Path::new("/nonexistent/goroda/cities.txt"));
        assert_eq!(catalog.len(), BUILTIN_CITIES.len());
        assert!(CityCatalog::load(Path::new("/nonexistent/goroda/cities.txt")).is_err());
    }

    #[test]
    fn test_random_city_uses_injected_source() {
        let catalog = CityCatalog::from_names(["Омск", "Москва", "Тула"], FAKE_CITIES);
        let rng = ScriptedRandom::new().with_picks([2, 0]);
        assert_eq!(catalog.random_city(&rng), Some("Тула"));
        assert_eq!(catalog.random_city(&rng), Some("Омск"));

        let empty = CityCatalog::from_names(Vec::<String>::new(), FAKE_CITIES);
        assert_eq!(empty.random_city(&rng), None);
    }
}
