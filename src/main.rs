use anyhow::Context;
use cellglow::{CellApp, GridSize, SimulationConfig, ViewConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional first argument: grid side as a power of two.
    let mut config = SimulationConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        let exponent: u32 = arg
            .parse()
            .with_context(|| format!("grid exponent must be a number, got {arg:?}"))?;
        config = config.with_grid(GridSize::from_log2(exponent));
    }

    CellApp::new(config, ViewConfig::default())?.run()
}
