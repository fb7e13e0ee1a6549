use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use steward_core::{Lifecycle, ResourceAdapter};

use crate::cli::{Commands, OutputFormat};
use crate::output::{print_model, print_models, print_success};

fn read_body(file: &Option<String>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn parse_model<M: DeserializeOwned>(content: &str) -> Result<M> {
    serde_json::from_str(content).context("Invalid model JSON")
}

fn model_with_id<M: DeserializeOwned>(id: &str) -> Result<M> {
    serde_json::from_value(json!({ "id": id })).context("Cannot build model from id")
}

fn id_of(value: &Value) -> &str {
    value.get("id").and_then(Value::as_str).unwrap_or("?")
}

/// Runs a resource command against one family.
pub async fn run<A>(lifecycle: &Lifecycle<A>, command: &Commands, format: OutputFormat) -> Result<()>
where
    A: ResourceAdapter,
    A::Model: Serialize + DeserializeOwned,
{
    match command {
        Commands::Create(args) => create(lifecycle, &args.file, format).await,
        Commands::Read(args) => read(lifecycle, &args.id, format).await,
        Commands::Update(args) => update(lifecycle, &args.file, &args.previous, format).await,
        Commands::Delete(args) => delete(lifecycle, &args.id).await,
        Commands::List(_) => list(lifecycle, format).await,
        Commands::Config => anyhow::bail!("config is not a resource command"),
    }
}

pub async fn create<A>(
    lifecycle: &Lifecycle<A>,
    file: &Option<String>,
    format: OutputFormat,
) -> Result<()>
where
    A: ResourceAdapter,
    A::Model: Serialize + DeserializeOwned,
{
    let kind = lifecycle.adapter().kind();
    let desired: A::Model = parse_model(&read_body(file)?)?;
    let created = serde_json::to_value(lifecycle.create(&desired).await?)?;
    print_success(&format!("Created {}/{}", kind.as_str().cyan(), id_of(&created).cyan()));
    print_model(&created, format)
}

pub async fn read<A>(lifecycle: &Lifecycle<A>, id: &str, format: OutputFormat) -> Result<()>
where
    A: ResourceAdapter,
    A::Model: Serialize + DeserializeOwned,
{
    let target: A::Model = model_with_id(id)?;
    let model = serde_json::to_value(lifecycle.read(&target).await?)?;
    print_model(&model, format)
}

pub async fn update<A>(
    lifecycle: &Lifecycle<A>,
    file: &Option<String>,
    previous: &Option<String>,
    format: OutputFormat,
) -> Result<()>
where
    A: ResourceAdapter,
    A::Model: Serialize + DeserializeOwned,
{
    let kind = lifecycle.adapter().kind();
    let desired: A::Model = parse_model(&read_body(file)?)?;
    let previous: Option<A::Model> = match previous {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read previous model: {path}"))?;
            Some(parse_model(&content)?)
        }
        None => None,
    };

    let updated = serde_json::to_value(lifecycle.update(&desired, previous.as_ref()).await?)?;
    print_success(&format!("Updated {}/{}", kind.as_str().cyan(), id_of(&updated).cyan()));
    print_model(&updated, format)
}

pub async fn delete<A>(lifecycle: &Lifecycle<A>, id: &str) -> Result<()>
where
    A: ResourceAdapter,
    A::Model: Serialize + DeserializeOwned,
{
    let kind = lifecycle.adapter().kind();
    let target: A::Model = model_with_id(id)?;
    lifecycle.delete(&target).await?;
    print_success(&format!("Deleted {}/{}", kind.as_str().cyan(), id.cyan()));
    Ok(())
}

pub async fn list<A>(lifecycle: &Lifecycle<A>, format: OutputFormat) -> Result<()>
where
    A: ResourceAdapter,
    A::Model: Serialize + DeserializeOwned,
{
    let models = lifecycle
        .list()
        .await?
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    print_models(&models, format)
}
