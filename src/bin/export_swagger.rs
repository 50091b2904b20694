//! Writes the Swagger document of a built-in pet store API.
//!
//! ```bash
//! export-swagger --config swagger.yaml --output swagger.json --indent
//! ```

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use http::Method;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use swaggerize::logging;
use swaggerize::model::ApiKeyLocation;
use swaggerize::{describe, Generator, GeneratorConfig, PathItemInfo, Reflect, SecurityDefinition};
use tracing::info;

/// Export the Swagger 2.0 document of the demo pet store API
#[derive(Parser)]
#[command(name = "export-swagger")]
#[command(about = "Export a Swagger 2.0 document", long_about = None)]
struct Cli {
    /// Generator configuration (YAML, TOML or JSON)
    #[arg(short, long, env = "SWAGGERIZE_CONFIG")]
    config: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the document
    #[arg(long, default_value_t = false)]
    indent: bool,

    /// Emit x-rust-* type extensions
    #[arg(long, default_value_t = false)]
    reflect_rust_types: bool,
}

#[derive(Serialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

#[derive(Serialize, Reflect)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Reflect)]
pub struct Pet {
    pub id: i64,
    /// Name given by the owner
    pub name: String,
    pub category: Option<Category>,
    pub tags: Vec<String>,
    pub status: PetStatus,
    pub attributes: HashMap<String, String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Reflect)]
pub struct NewPet {
    pub name: String,
    pub category: Option<Category>,
    #[swagger(default = "available")]
    pub status: String,
}

#[derive(Reflect)]
pub struct ListPetsParams {
    #[swagger(param = "status")]
    pub status: Option<PetStatus>,
    /// Maximum number of pets returned
    #[swagger(param = "limit", required = false, default = 20)]
    pub limit: u32,
    #[swagger(param = "X-Request-Id", location = "header", required = false)]
    pub request_id: String,
}

#[derive(Reflect)]
pub struct PetIdParams {
    #[swagger(path = "id")]
    pub id: i64,
}

fn register_demo_api(generator: &Generator) -> swaggerize::Result<()> {
    generator.set_path_item(
        &PathItemInfo::new("/pets", Method::GET)
            .title("List pets")
            .tag("pets"),
        Some(&describe::<ListPetsParams>()),
        None,
        Some(&describe::<Vec<Pet>>()),
    )?;
    generator.set_path_item(
        &PathItemInfo::new("/pets", Method::POST)
            .title("Add a pet")
            .tag("pets")
            .security("api_key"),
        None,
        Some(&describe::<NewPet>()),
        Some(&describe::<Pet>()),
    )?;
    generator.set_path_item(
        &PathItemInfo::new("/pets/{id:[0-9]+}", Method::GET)
            .title("Get a pet")
            .tag("pets"),
        Some(&describe::<PetIdParams>()),
        None,
        Some(&describe::<Pet>()),
    )?;
    generator.set_path_item(
        &PathItemInfo::new("/pets/{id:[0-9]+}", Method::DELETE)
            .title("Delete a pet")
            .tag("pets")
            .security("api_key"),
        Some(&describe::<PetIdParams>()),
        None,
        None,
    )?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init_logging()?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::from_env(),
    };
    config.indent_json |= cli.indent;
    config.reflect_rust_types |= cli.reflect_rust_types;
    if config.info.title.is_empty() {
        config.info.title = "Pet Store".to_string();
        config.info.version = env!("CARGO_PKG_VERSION").to_string();
    }
    config
        .security_definitions
        .entry("api_key".to_string())
        .or_insert_with(|| SecurityDefinition::api_key("X-API-Key", ApiKeyLocation::Header));

    let generator = Generator::from_config(&config);
    register_demo_api(&generator).context("failed to register demo API")?;
    let document = generator
        .gen_document()
        .context("failed to generate swagger document")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                path = %path.display(),
                definitions = generator.definitions_len(),
                "swagger document written"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&document)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
