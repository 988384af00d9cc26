use graphlet::config::Config;
use graphlet::error::Result;

/// Run the init command: write an example configuration to a file or stdout
pub fn run(output: Option<String>) -> Result<()> {
    let config = Config::default();

    match output {
        Some(output_path) => {
            graphlet::config::save_config(&config, &output_path)?;
            tracing::info!("📝 Generated example configuration: {}", output_path);
            tracing::info!("💡 Start the server with 'graphlet serve --config {}'", output_path);
        }
        None => {
            let toml_string = toml::to_string_pretty(&config)?;
            println!("{}", toml_string);
        }
    }

    Ok(())
}
