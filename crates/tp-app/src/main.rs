use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tp_ascii::GlyphRenderer;
use tp_core::traits::Source;
use tp_source::{FileSource, TagSource, UrlSource};

pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger la config puis appliquer les overrides CLI
    let mut config = cli.resolve_config()?;
    cli.apply_overrides(&mut config.render);

    // 5. Récupérer l'image
    let mut source = build_source(&cli)?;
    log::info!("Source : {}", source.describe());
    let pixels = source
        .load()
        .with_context(|| format!("Chargement impossible ({})", source.describe()))?;

    // 6. Rendu
    let renderer = GlyphRenderer::new(&config.charsets, &config.palette);
    let grid = renderer
        .render(&pixels, &config.render)
        .context("Rendu impossible")?;

    // 7. Sortie terminal
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    tp_render::write_grid(&mut out, &grid).context("Écriture sur stdout échouée")?;
    out.flush()?;
    Ok(())
}

/// Build the single source selected on the command line.
fn build_source(cli: &cli::Cli) -> Result<Box<dyn Source>> {
    if let Some(ref path) = cli.image {
        Ok(Box::new(FileSource::new(path)))
    } else if let Some(ref url) = cli.url {
        Ok(Box::new(UrlSource::new(url.as_str())?))
    } else if let Some(ref tag) = cli.tag {
        Ok(Box::new(TagSource::new(tag.as_str())?))
    } else {
        anyhow::bail!("Aucune source spécifiée.")
    }
}
