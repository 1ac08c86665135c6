//! Reference briefing catalog shipped with the engine, plus loading of
//! catalog directories from disk for authoring.

use std::fs;
use std::path::{Path, PathBuf};

use briefing_spec::{Catalog, CatalogDocument, CatalogError};
use include_dir::{Dir, include_dir};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

static BUILTIN: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/catalog");

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Raw JSON documents of the embedded catalog, sorted by file name.
pub fn builtin_documents() -> Vec<(&'static str, &'static str)> {
    let mut documents: Vec<(&'static str, &'static str)> = BUILTIN
        .files()
        .filter(|file| is_json(file.path()))
        .filter_map(|file| Some((file.path().to_str()?, file.contents_utf8()?)))
        .collect();
    documents.sort_by(|a, b| a.0.cmp(b.0));
    documents
}

/// Parses and validates the embedded catalog.
pub fn load_builtin() -> Result<Catalog, CatalogLoadError> {
    let documents = builtin_documents()
        .into_iter()
        .map(|(name, raw)| parse_document(Path::new(name), raw))
        .collect::<Result<Vec<_>, _>>()?;
    let catalog = Catalog::from_documents(documents)?;
    debug!(
        version = %catalog.version(),
        questions = catalog.question_count(),
        "builtin catalog loaded"
    );
    Ok(catalog)
}

/// Loads every `*.json` document under `root` (recursively, sorted by path)
/// and merges them into one catalog. A single file is accepted as well.
pub fn load_dir(root: impl AsRef<Path>) -> Result<Catalog, CatalogLoadError> {
    let root = root.as_ref();
    let documents = read_documents(root)?;
    let catalog = Catalog::from_documents(documents)?;
    debug!(
        root = %root.display(),
        version = %catalog.version(),
        questions = catalog.question_count(),
        "catalog loaded from disk"
    );
    Ok(catalog)
}

/// Reads and parses documents under `root` without validating them as a whole.
pub fn read_documents(root: impl AsRef<Path>) -> Result<Vec<CatalogDocument>, CatalogLoadError> {
    let root = root.as_ref();
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| CatalogLoadError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_json(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    paths
        .iter()
        .map(|path| {
            trace!(path = %path.display(), "reading catalog document");
            let raw = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
                path: path.clone(),
                source,
            })?;
            parse_document(path, &raw)
        })
        .collect()
}

fn parse_document(path: &Path, raw: &str) -> Result<CatalogDocument, CatalogLoadError> {
    CatalogDocument::from_json_str(raw).map_err(|source| CatalogLoadError::Document {
        path: path.to_path_buf(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
