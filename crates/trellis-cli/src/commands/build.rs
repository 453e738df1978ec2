use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use std::path::Path;
use trellis::trellis_router::ValueType;
use trellis::{PathValue, PercentEncoder, RouteTable};

pub fn execute(
    config: &Path,
    route: &str,
    values: &[String],
    query: &[String],
    fragment: Option<&str>,
) -> Result<()> {
    let table = RouteTable::load(config)?;
    let resource = table
        .resource(route)
        .ok_or_else(|| anyhow!("No resource with route '{}'", route))?;

    let params: Vec<_> = resource.route().path_params().cloned().collect();
    if values.len() != params.len() {
        bail!(
            "Route '{}' has {} path parameters, got {} values",
            resource,
            params.len(),
            values.len()
        );
    }

    let mut url = table.url(&resource);
    for (index, (param, text)) in params.iter().zip(values).enumerate() {
        let value = parse_value(&param.value_type(), text)
            .with_context(|| format!("Invalid value for {}", param.detailed()))?;
        url.set_path_param(index, value)?;
    }

    for q in query {
        match q.split_once('=') {
            Some((name, value)) => url.add_query_param(name, value),
            None => url.add_empty_query_param(q),
        };
    }
    url.set_fragment(fragment);

    println!("{}", url.build(&PercentEncoder)?.green());
    Ok(())
}

/// Parses command line text into a value of the given type
///
/// Dates are `yyyy-mm-dd`, segments are separated by `/`, and `-` is an
/// absent optional value.
fn parse_value(value_type: &ValueType, text: &str) -> Result<PathValue> {
    Ok(match value_type {
        ValueType::Text => PathValue::from(text),
        ValueType::Integer => PathValue::Integer(
            text.parse()
                .with_context(|| format!("'{}' is not an integer", text))?,
        ),
        ValueType::Date => PathValue::Date(
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .with_context(|| format!("'{}' is not a yyyy-mm-dd date", text))?,
        ),
        ValueType::Segments => PathValue::Segments(
            text.split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        ValueType::Optional(_) if text == "-" => PathValue::none(),
        ValueType::Optional(inner) => PathValue::some(parse_value(inner, text)?),
    })
}
