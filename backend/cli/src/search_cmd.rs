//! `wardrobe search`: run a catalog query from the terminal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use wardrobe_config::WardrobeConfig;
use wardrobe_search::{CatalogHit, DirectoryCorpus};

use crate::terminal_output::{render_table, Column};
use crate::wiring::open_catalog;

pub enum Query {
    Text(String),
    Image(PathBuf),
}

pub async fn run(config: &WardrobeConfig, query: Query) -> Result<()> {
    let (catalog, corpus) = open_catalog(config).await?;
    let hits = match query {
        Query::Text(text) => catalog.search_text(&text).await?,
        Query::Image(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            catalog.search_image_bytes(Bytes::from(bytes)).await?
        }
    };

    if hits.is_empty() {
        println!("No results found.");
    } else {
        print!("{}", hits_table(&hits, &corpus));
    }
    Ok(())
}

fn hits_table(hits: &[CatalogHit], corpus: &DirectoryCorpus) -> String {
    let rows: Vec<Vec<String>> = hits
        .iter()
        .enumerate()
        .map(|(rank, hit)| {
            vec![
                (rank + 1).to_string(),
                hit.id.clone(),
                format!("{:.4}", hit.score),
                corpus
                    .path(hit.position)
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    render_table(
        &[
            Column::right("rank"),
            Column::right("id"),
            Column::right("score"),
            Column::left("file"),
        ],
        &rows,
    )
}
