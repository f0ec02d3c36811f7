//! Export/restore of the raw documents

use std::path::Path;

use anyhow::{Context, bail};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::Config;
use crate::constants::storage_keys;
use crate::state::open_store;

pub async fn cmd_export(config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let mut documents = Map::new();

    for key in storage_keys::ALL {
        if let Some(raw) = store.raw(key).await? {
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => {
                    documents.insert((*key).to_string(), value);
                }
                Err(e) => warn!("Skipping unreadable document {}: {}", key, e),
            }
        }
    }

    let json = serde_json::to_string_pretty(&documents)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Exported {} documents to {}", documents.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

pub async fn cmd_restore(config: &Config, input: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let Value::Object(documents) = serde_json::from_str(&text).context("Invalid export file")?
    else {
        bail!("Export file must hold a JSON object keyed by document name");
    };

    let store = open_store(config).await?;
    let mut restored = 0;

    for (key, value) in documents {
        if !storage_keys::ALL.contains(&key.as_str()) {
            println!("Skipping unknown document: {key}");
            continue;
        }

        store.put_raw(&key, value.to_string()).await?;
        restored += 1;
    }

    println!("✓ Restored {restored} documents");

    Ok(())
}
