use crate::{document::StatementDocument, error::CliError};
use clap::Parser;
use commands::Commands;
use dynsql::{
    config::GlobalConfiguration,
    renderer::{RenderedStatement, strategy::RenderingStrategies},
};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod convert;
mod document;
mod error;

#[derive(Parser)]
#[command(name = "dynsql", version = "0.1.0", about = "Dynamic SQL renderer")]
struct Cli {
    #[arg(long, global = true, help = "Global configuration JSON file")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let global = match &cli.config {
        Some(path) => GlobalConfiguration::from_file(path)?,
        None => GlobalConfiguration::from_env()?,
    };
    global.install();

    match cli.command {
        Commands::Render {
            file,
            strategy,
            strict,
            json,
        } => {
            let strategy = RenderingStrategies::by_name(&strategy)
                .ok_or_else(|| CliError::UnknownStrategy(strategy.clone()))?;
            info!("Rendering {} with the {} strategy", file, strategy.name());

            let source = std::fs::read_to_string(&file)?;
            let document: StatementDocument = serde_json::from_str(&source)?;
            let statement = convert::to_statement(&document, strict)?;
            let rendered = statement.render(strategy)?;
            print_rendered(&rendered, json)?;
        }
        Commands::Strategies => {
            for name in RenderingStrategies::names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn print_rendered(rendered: &RenderedStatement, as_json: bool) -> Result<(), CliError> {
    let parameters = rendered.parameters().to_json();
    if as_json {
        let output = json!({ "sql": rendered.sql(), "parameters": parameters });
        let text = serde_json::to_string_pretty(&output).map_err(CliError::JsonSerialize)?;
        println!("{text}");
    } else {
        println!("{}", rendered.sql());
        let text = serde_json::to_string_pretty(&parameters).map_err(CliError::JsonSerialize)?;
        println!("{text}");
    }
    Ok(())
}
