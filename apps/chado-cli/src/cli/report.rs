use std::path::Path;

use anyhow::Context;
use chado_core::parse_curie;
use chado_db::genotype::{
    find_current_genotype, find_genotype_by_curie, genotype_components, genotype_current_dbxrefs,
    genotype_current_symbols,
};
use chado_genotype::GenotypeConfig;
use clap::Args;

use crate::cli::{open_db, OutputFormat};
use crate::dto::{stored_genotype_to_dto, StoredGenotypeDto};

#[derive(Args)]
pub struct ReportArgs {
    /// Genotype uniquename or curie (e.g. FBgo0000001)
    #[arg(required = true)]
    pub genotype: String,
}

pub fn run(
    args: ReportArgs,
    db: &Path,
    config: &GenotypeConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let conn = open_db(db)?;
    let lookup = if parse_curie(&args.genotype, &config.curie_prefix).is_ok() {
        find_genotype_by_curie(&conn, &args.genotype, &config.flybase_db)?
    } else {
        find_current_genotype(&conn, &args.genotype, &config.flybase_db, &config.curie_prefix)?
    };
    let found = lookup
        .require("genotype", &args.genotype)
        .with_context(|| format!("No registered genotype {:?}", args.genotype))?;

    let genotype_id = found.genotype.genotype_id;
    let out = stored_genotype_to_dto(
        found,
        genotype_current_symbols(&conn, genotype_id)?,
        genotype_current_dbxrefs(&conn, genotype_id, &config.flybase_db)?,
        genotype_components(&conn, genotype_id)?,
    );

    match format {
        OutputFormat::Text => print_text(&out),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&out)?),
    }
    Ok(())
}

fn print_text(out: &StoredGenotypeDto) {
    println!("Genotype:    {}", out.uniquename);
    println!("Curie:       {}", out.curie);
    println!("Description: {}", out.description.as_deref().unwrap_or("-"));
    println!("Symbols:     {}", out.symbols.join(", "));
    println!("Dbxrefs:     {}", out.dbxrefs.join(", "));
    println!();
    println!("  {:<7} {:<5} {:<14} Name", "Group", "Rank", "Feature");
    for c in &out.components {
        println!("  {:<7} {:<5} {:<14} {}", c.cgroup, c.rank, c.uniquename, c.name);
    }
}
