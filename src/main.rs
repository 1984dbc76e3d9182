use anyhow::Context;
use plankit::{init_logging, sample_home, PaintMode, PlanComponent, Preferences, PreferencesManager};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let home = sample_home()?;
    let preferences = Arc::new(PreferencesManager::new(Preferences::default(), home.bus().clone()));
    if let Ok(path) = PreferencesManager::config_file_path() {
        if path.exists() {
            preferences
                .load(&path)
                .with_context(|| format!("loading preferences from {}", path.display()))?;
        }
    }
    let mut plan = PlanComponent::new(&home, preferences);
    plan.revalidate(&home);

    // Output file as first argument, SVG on stdout without one.
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png")) => {
            let png = plan.render_png(&home, PaintMode::Print)?;
            std::fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Plan written to {}", path.display());
        }
        Some(path) => {
            let svg = plan.export_svg(&home, None, None)?;
            std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Plan written to {}", path.display());
        }
        None => {
            let svg = plan.export_svg(&home, None, None)?;
            std::io::stdout().lock().write_all(svg.as_bytes())?;
        }
    }
    Ok(())
}
