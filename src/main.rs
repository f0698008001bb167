use tracing_subscriber::EnvFilter;

use phase_portrait::{PlotConfig, Polynomial, RenderAdapter, WindowRenderer, run};

const PANEL: usize = 600;

fn init_logging() {
    // RUST_LOG only tunes log output, never the plot parameters
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,phase_portrait=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = PlotConfig::default();
    let func = Polynomial::default_field();

    println!("f(z) = z^3 - i z^4 - 3 z^6 over [-{0}, {0}]^2, {1}x{1} samples, {2} levels (Esc to close)",
        config.size, config.resolution, config.n_levels);

    // Any failure here aborts before a window is opened
    let portrait = run(&config, &func)?;

    WindowRenderer::new(PANEL).render(&portrait)?;
    Ok(())
}
