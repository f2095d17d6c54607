use crate::core::classify::classify_entry;
use crate::models::{Category, DirectoryEntry, Resource};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUNDLED_GRANTS: &str = include_str!("../data/grants.json");
const BUNDLED_INCUBATORS: &str = include_str!("../data/incubators.json");
const BUNDLED_INVESTORS: &str = include_str!("../data/investors.json");
const BUNDLED_DIRECTORY: &str = include_str!("../data/directory.json");

/// Errors that can occur while loading the datasets
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only resource datasets, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    grants: Vec<Resource>,
    incubators: Vec<Resource>,
    investors: Vec<Resource>,
    directory: Vec<DirectoryEntry>,
}

impl Catalog {
    /// Build a catalog from in-memory records, deriving directory fields
    pub fn new(
        grants: Vec<Resource>,
        incubators: Vec<Resource>,
        investors: Vec<Resource>,
        directory: Vec<DirectoryEntry>,
    ) -> Self {
        Self {
            grants,
            incubators,
            investors,
            directory: directory.into_iter().map(classify_entry).collect(),
        }
    }

    /// Datasets compiled into the binary
    pub fn bundled() -> Result<Self, CatalogError> {
        Ok(Self::new(
            parse("grants.json", BUNDLED_GRANTS)?,
            parse("incubators.json", BUNDLED_INCUBATORS)?,
            parse("investors.json", BUNDLED_INVESTORS)?,
            parse("directory.json", BUNDLED_DIRECTORY)?,
        ))
    }

    /// Load the four dataset files from a directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        Ok(Self::new(
            read(dir, "grants.json")?,
            read(dir, "incubators.json")?,
            read(dir, "investors.json")?,
            read(dir, "directory.json")?,
        ))
    }

    /// Bundled data unless a directory override is configured
    pub fn load(dir: Option<&Path>) -> Result<Self, CatalogError> {
        match dir {
            Some(dir) => Self::load_from_dir(dir),
            None => Self::bundled(),
        }
    }

    pub fn grants(&self) -> &[Resource] {
        &self.grants
    }

    pub fn incubators(&self) -> &[Resource] {
        &self.incubators
    }

    pub fn investors(&self) -> &[Resource] {
        &self.investors
    }

    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// Every grant, incubator and investor with its category, in dataset order
    pub fn resources(&self) -> impl Iterator<Item = (Category, &Resource)> + '_ {
        let grants = self.grants.iter().map(|r| (Category::Grant, r));
        let incubators = self.incubators.iter().map(|r| (Category::for_incubator(r), r));
        let investors = self.investors.iter().map(|r| (Category::Investor, r));
        grants.chain(incubators).chain(investors)
    }

    pub fn len(&self) -> usize {
        self.grants.len() + self.incubators.len() + self.investors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse<T: DeserializeOwned>(name: &str, json: &str) -> Result<Vec<T>, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Parse {
        name: name.to_string(),
        source,
    })
}

fn read<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>, CatalogError> {
    let path = dir.join(name);
    let json = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::debug!("Loaded dataset from {}", path.display());
    parse(name, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubRegion;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();

        assert!(!catalog.grants().is_empty());
        assert!(!catalog.incubators().is_empty());
        assert!(!catalog.investors().is_empty());
        assert_eq!(catalog.directory().len(), 55);
        assert_eq!(
            catalog.len(),
            catalog.grants().len() + catalog.incubators().len() + catalog.investors().len()
        );
    }

    #[test]
    fn test_bundled_directory_is_classified() {
        let catalog = Catalog::bundled().unwrap();

        let sine = catalog
            .directory()
            .iter()
            .find(|e| e.name == "SINE (IIT Bombay)")
            .unwrap();
        assert_eq!(sine.id, "sine-iit-bombay");
        assert_eq!(sine.sub_region, SubRegion::East);
    }

    #[test]
    fn test_resources_iterate_in_dataset_order() {
        let catalog = Catalog::bundled().unwrap();
        let categories: Vec<Category> = catalog.resources().map(|(c, _)| c).collect();

        assert_eq!(categories.len(), catalog.len());
        assert_eq!(categories[0], Category::Grant);
        assert_eq!(*categories.last().unwrap(), Category::Investor);
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let err = Catalog::load_from_dir("/nonexistent/segpt-data").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_malformed_dataset_is_parse_error() {
        let err = parse::<Resource>("grants.json", "{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains("grants.json"));
    }
}
