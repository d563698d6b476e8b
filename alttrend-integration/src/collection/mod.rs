/// Insertion ordered map using the fast, non-cryptographic [`fnv`] hasher.
pub type FnvIndexMap<K, V> = indexmap::IndexMap<K, V, fnv::FnvBuildHasher>;
