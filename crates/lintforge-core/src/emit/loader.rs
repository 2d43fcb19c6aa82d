//! Consumer-side artifact loading

use super::{ArtifactStore, parse};
use crate::error::ForgeError;
use crate::flags::{Options, to_identifier};
use crate::layer::Configuration;
use crate::result::Result;

/// Resolves options to the artifact generated for them
#[derive(Debug, Clone)]
pub struct ArtifactLoader<S> {
    store: S,
}

impl<S: ArtifactStore> ArtifactLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Base configuration followed by its deltas
    ///
    /// Fails with [`ForgeError::NotFoundError`] when the combination was
    /// never generated, or was generated under a different flag set.
    pub fn load(&self, options: &Options) -> Result<Vec<Configuration>> {
        let vector = options.vector();
        let identifier = to_identifier(vector);
        tracing::debug!("Loading artifact {} for vector {}", identifier, vector);

        let content = self
            .store
            .get(&identifier)?
            .ok_or_else(|| ForgeError::NotFoundError {
                identifier: identifier.clone(),
                vector,
            })?;
        parse(&content, self.store.format())
    }

    /// Base configuration only
    pub fn load_base(&self, options: &Options) -> Result<Configuration> {
        self.load(options)?
            .into_iter()
            .next()
            .ok_or_else(|| ForgeError::format_error("Artifact contains no configuration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{ArtifactFormat, MemoryArtifactStore, serialize};
    use crate::error::ErrorKind;
    use crate::flags::Flag;
    use serde_json::json;

    #[test]
    fn test_load_by_options() {
        let store = MemoryArtifactStore::new(ArtifactFormat::Esm);
        let options = Options::default().with(Flag::React);
        let configs: Vec<Configuration> =
            serde_json::from_value(json!([{ "rules": { "react/jsx-key": "error" } }])).unwrap();
        store
            .put(&options.identifier(), &serialize(&configs, ArtifactFormat::Esm).unwrap())
            .unwrap();

        let loader = ArtifactLoader::new(store);
        assert_eq!(loader.load(&options).unwrap(), configs);
        assert_eq!(loader.load_base(&options).unwrap(), configs[0]);
    }

    #[test]
    fn test_missing_artifact_is_not_found() {
        let loader = ArtifactLoader::new(MemoryArtifactStore::new(ArtifactFormat::Json));
        let err = loader.load(&Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("b6589fc6"));
    }

    #[test]
    fn test_empty_artifact_has_no_base() {
        let store = MemoryArtifactStore::new(ArtifactFormat::Json);
        store.put(&Options::default().identifier(), "[]").unwrap();
        let loader = ArtifactLoader::new(store);
        assert!(loader.load(&Options::default()).unwrap().is_empty());
        assert!(loader.load_base(&Options::default()).is_err());
    }
}
