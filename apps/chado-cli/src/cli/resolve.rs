use std::path::Path;

use anyhow::Context;
use chado_db::lookup::get_pub;
use chado_genotype::{GenotypeAnnotation, GenotypeConfig};
use clap::Args;
use tracing::info;

use crate::cli::{open_db, print_lines, OutputFormat};
use crate::dto::{annotation_to_dto, AnnotationDto};

#[derive(Args)]
pub struct ResolveArgs {
    /// Genotype text, e.g. "Df(2L)x/wg[+] P{UAS-wg.A}"
    #[arg(required = true)]
    pub genotype: String,

    /// Reference (FBrf) used to choose between candidate constructs
    #[arg(long = "pub")]
    pub pub_uniquename: Option<String>,

    /// Register the genotype. Without this every write is rolled back.
    #[arg(long)]
    pub commit: bool,
}

pub fn run(
    args: ResolveArgs,
    db: &Path,
    config: &GenotypeConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut conn = open_db(db)?;
    let tx = conn.transaction()?;

    let pub_uniquename = args
        .pub_uniquename
        .as_deref()
        .unwrap_or(config.unattributed_pub.as_str());
    let pub_id = get_pub(&tx, pub_uniquename)
        .with_context(|| format!("Unknown reference {}", pub_uniquename))?
        .pub_id;

    let mut annotation = GenotypeAnnotation::new(&args.genotype, &tx, pub_id, config)
        .with_context(|| format!("Failed to resolve genotype {:?}", args.genotype))?;
    if args.commit {
        annotation.get_known_or_create_new(&tx)?;
    }

    let committed = args.commit && annotation.is_clean();
    if committed {
        tx.commit()?;
        info!(curie = ?annotation.curie, "committed");
    } else {
        tx.rollback()?;
    }

    let out = annotation_to_dto(&annotation, committed);
    match format {
        OutputFormat::Text => print_text(&out),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&out)?),
    }

    if !out.errors.is_empty() {
        anyhow::bail!("{} error(s) in genotype {:?}", out.errors.len(), out.input);
    }
    Ok(())
}

fn print_text(out: &AnnotationDto) {
    println!("Input:       {}", out.input);
    if let Some(uniquename) = &out.uniquename {
        println!("Genotype:    {}", uniquename);
    }
    if let Some(description) = &out.description {
        println!("Description: {}", description);
    }
    if let Some(curie) = &out.curie {
        let state = if out.is_new { "new" } else { "existing" };
        println!("Curie:       {} ({})", curie, state);
    }
    if !out.committed {
        println!("(dry run, nothing committed)");
    }

    for group in &out.cgroups {
        let rank = group.rank.map_or("-".to_string(), |r| r.to_string());
        println!();
        println!(
            "  [{}] {} => {}",
            rank,
            group.input,
            group.name.as_deref().unwrap_or("?")
        );
        for c in &group.components {
            println!(
                "      {:<20} {:<14} {:<32} at_locus={}{}",
                c.symbol,
                c.uniquename.as_deref().unwrap_or("-"),
                c.type_name.as_deref().unwrap_or("-"),
                c.at_locus,
                if c.is_new { " (new)" } else { "" }
            );
        }
    }
    println!();
    print_lines("Notes", &out.notes);
    print_lines("Warnings", &out.warnings);
    print_lines("Errors", &out.errors);
}
