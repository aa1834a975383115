use super::ExportArgs;
use spotify_extract::{
    extract, load_references, preview, write_csv, CatalogClient, Projection, TRENDING_NOW_TAMIL,
};
use std::path::PathBuf;

/// Handle the tracks and genres commands
pub async fn handle_export<P: Projection>(
    client: &dyn CatalogClient,
    projection: &P,
    args: &ExportArgs,
    default_output: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let references: Vec<String> = match &args.input {
        Some(path) => load_references(path)?,
        None => TRENDING_NOW_TAMIL.iter().map(|r| r.to_string()).collect(),
    };

    log::info!("Processing {} track references", references.len());

    let extraction = extract(client, projection, &references).await;

    if args.preview > 0 {
        eprintln!("{}", preview(&extraction.rows, args.preview)?);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_output));
    write_csv(&output, &extraction.rows)?;

    println!(
        "✅ Wrote {} row{} to {}",
        extraction.rows.len(),
        if extraction.rows.len() == 1 { "" } else { "s" },
        output.display()
    );

    if !extraction.is_complete() {
        eprintln!(
            "⚠️  {} of {} references failed (see log above)",
            extraction.failures.len(),
            extraction.attempted()
        );
    }

    Ok(())
}
