use std::path::Path;

use anyhow::Context;
use chado_db::schema::{init_db, seed_vocabulary};

use crate::cli::{open_db, OutputFormat};

pub fn run(db: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let conn = open_db(db)?;
    init_db(&conn).context("Failed to create schema")?;
    let seeded = seed_vocabulary(&conn).context("Failed to seed vocabulary")?;

    match format {
        OutputFormat::Text => {
            println!("Initialized {} ({} vocabulary rows added)", db.display(), seeded);
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "database": db.display().to_string(),
                "seeded_rows": seeded,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
