//! Package dictionary: canonical name-to-id encoding plus topic labels.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::debug;

use super::PackageId;
use super::artifact::map_io;
use super::error::{ModelError, ModelResult};

/// Partition of an input stack into ids the model knows and names it does not.
///
/// Duplicates collapse on both sides; the sets keep canonical (ascending)
/// order so downstream output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub known_ids: BTreeSet<PackageId>,
    pub unknown_names: BTreeSet<String>,
}

impl Resolution {
    /// Number of distinct names in the request.
    ///
    /// Known names map to distinct ids (the dictionary is a bijection), so
    /// the distinct-name count is the sum of both partitions.
    pub fn total(&self) -> usize {
        self.known_ids.len() + self.unknown_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Fraction of distinct names the model does not know.
    ///
    /// Returns `0.0` for an empty resolution; callers short-circuit that case
    /// before applying any threshold, so no division by zero can occur.
    pub fn unknown_fraction(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.unknown_names.len() as f32 / self.total() as f32
    }
}

/// Read-only package catalog built from the dictionary artifacts.
///
/// Ids are dense `0..len`, matching beta row indices, which the loader
/// enforces. Lookups never invent a default id: an unresolved name stays a
/// name.
#[derive(Debug, Clone)]
pub struct PackageCatalog {
    name_to_id: HashMap<String, PackageId>,
    id_to_name: Vec<String>,
    topics: Vec<Vec<String>>,
}

impl PackageCatalog {
    pub const PACKAGE_DICT: &'static str = "package_id_dict.json";
    pub const TOPIC_DICT: &'static str = "package_topic_dict.json";

    /// Loads the package dictionary and the optional topic dictionary.
    pub fn load(dir: &Path) -> ModelResult<Self> {
        let package_path = dir.join(Self::PACKAGE_DICT);
        let bytes =
            std::fs::read(&package_path).map_err(|e| map_io("package_id_dict", &package_path, e))?;

        let raw: HashMap<String, PackageId> =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::MalformedJson {
                name: "package_id_dict",
                path: package_path.clone(),
                source,
            })?;

        let len = raw.len();
        let mut id_to_name = vec![String::new(); len];
        let mut seen = vec![false; len];

        for (name, id) in &raw {
            let index = *id as usize;
            if index >= len {
                return Err(ModelError::DictionaryIdOutOfRange {
                    name: "package_id_dict",
                    id: *id,
                    len,
                });
            }
            if seen[index] {
                return Err(ModelError::DuplicateDictionaryId {
                    name: "package_id_dict",
                    id: *id,
                });
            }
            seen[index] = true;
            id_to_name[index] = name.clone();
        }

        let topics = Self::load_topics(dir, &raw, len)?;

        debug!(packages = len, "package catalog loaded");

        Ok(Self {
            name_to_id: raw,
            id_to_name,
            topics,
        })
    }

    fn load_topics(
        dir: &Path,
        name_to_id: &HashMap<String, PackageId>,
        len: usize,
    ) -> ModelResult<Vec<Vec<String>>> {
        let topic_path = dir.join(Self::TOPIC_DICT);
        let mut topics = vec![Vec::new(); len];

        let bytes = match std::fs::read(&topic_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no topic dictionary present, topic lists will be empty");
                return Ok(topics);
            }
            Err(e) => return Err(map_io("package_topic_dict", &topic_path, e)),
        };

        let raw: HashMap<String, Vec<String>> =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::MalformedJson {
                name: "package_topic_dict",
                path: topic_path,
                source,
            })?;

        let mut unmatched = 0usize;
        for (name, labels) in raw {
            match name_to_id.get(&name) {
                Some(&id) => topics[id as usize] = labels,
                None => unmatched += 1,
            }
        }
        if unmatched > 0 {
            debug!(unmatched, "topic entries without a package id were skipped");
        }

        Ok(topics)
    }

    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<PackageId> {
        self.name_to_id.get(name).copied()
    }

    /// Name for a dense id below `len()`.
    pub fn name_of(&self, id: PackageId) -> &str {
        &self.id_to_name[id as usize]
    }

    /// Topic labels for a dense id below `len()`; empty when none were published.
    pub fn topics_of(&self, id: PackageId) -> &[String] {
        &self.topics[id as usize]
    }

    /// Splits names into known ids and unknown names.
    pub fn resolve<'a, I>(&self, names: I) -> Resolution
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolution = Resolution::default();

        for name in names {
            match self.name_to_id.get(name) {
                Some(&id) => {
                    resolution.known_ids.insert(id);
                }
                None => {
                    resolution.unknown_names.insert(name.to_string());
                }
            }
        }

        resolution
    }
}
