use objgraph_serde::{Codec, CodecError, ErrorKind, Serializable};
use std::collections::BTreeMap;
use tracing::{debug, warn};


/// Holds at most one encoded value per parameter type.
///
/// Entries are keyed by [`Serializable::type_name`]. Values are decoded on every lookup,
/// so each caller gets its own copy and nothing returned aliases the store.
#[derive(Clone, Default, Debug)]
pub struct ParamStore {
    codec: Codec,
    entries: BTreeMap<String, Vec<u8>>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(codec: Codec) -> Self {
        Self {
            codec,
            entries: BTreeMap::new(),
        }
    }

    /// Encodes `param` and stores it, replacing any previous value of the same type.
    pub fn set<T: Serializable>(&mut self, param: &T) -> Result<(), CodecError> {
        let name = T::type_name();
        let blob = self.codec.encode(param)?;
        debug!(%name, len = blob.len(), "set parameter");
        self.entries.insert(name.into_owned(), blob);
        Ok(())
    }

    pub fn get<T: Serializable>(&self) -> Result<Option<T>, CodecError> {
        let name = T::type_name();
        let blob = self.entries.get(&*name).map(Vec::as_slice);
        self.codec.decode_opt(blob)
    }

    /// Like [`ParamStore::get`], but a missing parameter is created from `T::default()` and stored.
    ///
    /// A stored value that no longer decodes as `T`, e.g. after a field was added to `T`,
    /// counts as missing and is overwritten.
    pub fn get_or_default<T: Serializable + Default>(&mut self) -> Result<T, CodecError> {
        match self.get() {
            Ok(Some(param)) => return Ok(param),
            Ok(None) => {}
            Err(e) if matches!(e.kind(), ErrorKind::TypeMismatch | ErrorKind::Format) => {
                warn!(
                    name = %T::type_name(),
                    error = %e,
                    "replacing stale parameter with default"
                );
            }
            Err(e) => return Err(e),
        }
        let param = T::default();
        self.set(&param)?;
        Ok(param)
    }

    /// Returns whether a value was removed.
    pub fn remove<T: Serializable>(&mut self) -> bool {
        self.entries.remove(&*T::type_name()).is_some()
    }

    pub fn contains<T: Serializable>(&self) -> bool {
        self.entries.contains_key(&*T::type_name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the contents with `(name, blob)` rows read from a persistence layer.
    ///
    /// Empty blobs stand for absent parameters.
    /// A row that does not decode as the type it is named after is skipped.
    /// Returns the number of rows skipped.
    pub fn load<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        self.entries.clear();
        let mut skipped = 0;
        for (name, blob) in rows {
            if blob.is_empty() {
                continue;
            }
            match self.codec.inspect(&blob) {
                Ok(Some(inspected)) if inspected.type_name == name => {
                    self.entries.insert(name, blob);
                }
                Ok(Some(inspected)) => {
                    warn!(%name, stored = %inspected.type_name, "skipping mislabeled parameter");
                    skipped += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(%name, error = %e, "skipping unreadable parameter");
                    skipped += 1;
                }
            }
        }
        debug!(loaded = self.entries.len(), skipped, "loaded parameters");
        skipped
    }

    /// The stored `(name, blob)` rows, ordered by name.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(name, blob)| (name.as_str(), blob.as_slice()))
    }
}
