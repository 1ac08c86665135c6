use std::path::PathBuf;

use anyhow::{Result, bail};
use briefing_catalog::{CatalogLoadError, builtin_documents, read_documents};
use briefing_spec::{Catalog, CatalogDocument, CatalogError};
use clap::Args;
use serde_json::json;

#[derive(Args, Debug, Clone)]
pub struct LintArgs {
    /// Catalog files or directories, merged before validation; the built-in catalog when empty
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

pub fn run(args: LintArgs) -> Result<()> {
    let documents = collect_documents(&args.paths)?;
    match Catalog::from_documents(documents) {
        Ok(catalog) => {
            if args.json {
                let report = json!({
                    "ok": true,
                    "version": catalog.version().to_string(),
                    "digest": catalog.digest(),
                    "blocks": catalog.all_blocks().len(),
                    "questions": catalog.question_count(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "ok: catalog {} ({} blocks, {} questions, digest {})",
                    catalog.version(),
                    catalog.all_blocks().len(),
                    catalog.question_count(),
                    catalog.digest()
                );
            }
            Ok(())
        }
        Err(CatalogError::Authoring { issues }) => {
            if args.json {
                let report = json!({ "ok": false, "issues": issues });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for issue in &issues {
                    eprintln!("error: {issue}");
                }
            }
            bail!("catalog has {} authoring issue(s)", issues.len());
        }
        Err(err) => Err(err.into()),
    }
}

fn collect_documents(paths: &[PathBuf]) -> Result<Vec<CatalogDocument>> {
    if paths.is_empty() {
        return builtin_documents()
            .into_iter()
            .map(|(name, raw)| {
                CatalogDocument::from_json_str(raw).map_err(|source| {
                    anyhow::Error::from(CatalogLoadError::Document {
                        path: PathBuf::from(name),
                        source,
                    })
                })
            })
            .collect();
    }
    let mut documents = Vec::new();
    for path in paths {
        documents.extend(read_documents(path)?);
    }
    Ok(documents)
}
