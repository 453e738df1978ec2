use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use trellis::RouteTable;

pub fn execute(config: &Path, detailed: bool) -> Result<()> {
    let table = RouteTable::load(config)?;

    println!("{}", "Resources".green().bold());
    println!();

    if detailed {
        for resource in table.root.iter() {
            let route = resource.route().to_string();
            match resource.path_param() {
                Some(param) => println!("  {:<30} {}", route, param.detailed().cyan()),
                None => println!("  {}", route),
            }
        }
    } else {
        let mut out = String::new();
        table.root.print(&mut out)?;
        for line in out.lines() {
            println!("  {}", line);
        }
    }

    if !table.params.is_empty() {
        println!();
        println!("{}", "Path parameters".green().bold());
        println!();
        for param in &table.params {
            let constant = table.params.constant(param)?;
            println!("  {:<30} {}", constant, param.detailed().cyan());
        }
    }

    Ok(())
}
