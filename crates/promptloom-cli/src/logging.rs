use promptloom_config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Output goes to stderr so command output stays pipeable.
pub fn init(config: &LoggingConfig, debug: bool) -> anyhow::Result<()> {
    let level = if debug {
        "debug".to_string()
    } else {
        config.level.to_string()
    };

    let mut filter = EnvFilter::try_new(&level)?;
    for (module, module_level) in &config.module_levels {
        filter = filter.add_directive(format!("{}={}", module, module_level).parse()?);
    }

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_format {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }
    Ok(())
}
