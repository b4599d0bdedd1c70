//! Exact-match index over training manifests.
//!
//! Every training manifest is keyed by the 64-bit hash of its canonical
//! package-set encoding. Lookup is a bucket probe plus a true set-equality
//! check, so a hash collision costs a short scan instead of a wrong answer.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::debug;

use super::artifact::map_io;
use super::error::{ModelError, ModelResult};
use super::{ManifestId, PackageId};
use crate::hashing::{hash_package_set, hash_sorted_ids};

#[derive(Debug, Clone)]
pub struct ManifestIndex {
    buckets: HashMap<u64, Vec<ManifestId>>,
    contents: Vec<Box<[PackageId]>>,
}

impl ManifestIndex {
    pub const MANIFEST_DICT: &'static str = "manifest_id_dict.json";

    /// Loads the manifest dictionary and builds the hash index.
    ///
    /// `packages` is the catalog size; every referenced package id must have
    /// a beta row below it.
    pub fn load(dir: &Path, packages: usize) -> ModelResult<Self> {
        let path = dir.join(Self::MANIFEST_DICT);
        let bytes = std::fs::read(&path).map_err(|e| map_io("manifest_id_dict", &path, e))?;

        let raw: HashMap<String, Vec<PackageId>> =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::MalformedJson {
                name: "manifest_id_dict",
                path: path.clone(),
                source,
            })?;

        Self::from_entries(raw, packages)
    }

    fn from_entries(
        raw: HashMap<String, Vec<PackageId>>,
        packages: usize,
    ) -> ModelResult<Self> {
        let len = raw.len();
        let mut contents: Vec<Option<Box<[PackageId]>>> = vec![None; len];

        for (key, ids) in raw {
            let manifest_id: ManifestId =
                key.parse().map_err(|_| ModelError::BadDictionaryKey {
                    name: "manifest_id_dict",
                    key: key.clone(),
                })?;

            let index = manifest_id as usize;
            if index >= len {
                return Err(ModelError::DictionaryIdOutOfRange {
                    name: "manifest_id_dict",
                    id: manifest_id,
                    len,
                });
            }
            if contents[index].is_some() {
                return Err(ModelError::DuplicateDictionaryId {
                    name: "manifest_id_dict",
                    id: manifest_id,
                });
            }

            let mut ids = ids;
            ids.sort_unstable();
            ids.dedup();

            for &package_id in &ids {
                if package_id as usize >= packages {
                    return Err(ModelError::PackageIdOutOfRange {
                        manifest_id,
                        package_id,
                        packages,
                    });
                }
            }

            contents[index] = Some(ids.into_boxed_slice());
        }

        // Dense keys plus the duplicate check above mean every slot is filled.
        let contents: Vec<Box<[PackageId]>> = contents
            .into_iter()
            .map(|slot| slot.expect("dense manifest ids verified above"))
            .collect();

        let mut buckets: HashMap<u64, Vec<ManifestId>> = HashMap::with_capacity(len);
        for (manifest_id, ids) in contents.iter().enumerate() {
            buckets
                .entry(hash_sorted_ids(ids))
                .or_default()
                .push(manifest_id as ManifestId);
        }

        debug!(
            manifests = len,
            buckets = buckets.len(),
            "manifest index built"
        );

        Ok(Self { buckets, contents })
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Package set of a known manifest id (ascending, deduplicated).
    pub fn contents_of(&self, manifest_id: ManifestId) -> &[PackageId] {
        &self.contents[manifest_id as usize]
    }

    /// Finds the manifest whose package set equals `ids` exactly.
    ///
    /// Order-independent and routine: `None` is the everyday answer for a
    /// stack the training corpus never saw, never an error. If multiple
    /// training manifests share one set, the lowest id wins.
    pub fn match_manifest(&self, ids: &BTreeSet<PackageId>) -> Option<ManifestId> {
        let bucket = self.buckets.get(&hash_package_set(ids))?;

        bucket
            .iter()
            .copied()
            .find(|&manifest_id| set_equals(&self.contents[manifest_id as usize], ids))
    }
}

fn set_equals(sorted: &[PackageId], set: &BTreeSet<PackageId>) -> bool {
    sorted.len() == set.len() && sorted.iter().zip(set.iter()).all(|(a, b)| a == b)
}
