use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use trellis::trellis_router::PathParamValues;
use trellis::RouteTable;

#[derive(Serialize)]
struct MatchOutput<'a> {
    resource: String,
    complete: bool,
    params: &'a PathParamValues,
    data: Option<String>,
}

pub fn execute(config: &Path, path: &str, json: bool) -> Result<()> {
    let table = RouteTable::load(config)?;
    let m = table.root.match_path(path);

    if json {
        let output = MatchOutput {
            resource: m.resource.to_string(),
            complete: m.complete,
            params: &m.params,
            data: m.resource.data().map(|d| d.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if m.complete {
        println!("{} {}", "✓".green(), m.resource.to_string().cyan().bold());
    } else {
        println!(
            "{} {} (partial match)",
            "⚠".yellow(),
            m.resource.to_string().cyan()
        );
    }

    if let Some(data) = m.resource.data() {
        println!("  data: {}", data);
    }
    for (param, value) in m.params.iter() {
        println!("  {} = {}", param.name().cyan(), value);
    }

    Ok(())
}
