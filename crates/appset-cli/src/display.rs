//! Output formatting for previews
//!
//! - `name`: one `<kind>/<name>` line per object
//! - `json`: pretty-printed JSON
//! - `yaml`: YAML

use appset_core::{Application, Resource, group_by_kind};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

use crate::error::{CliError, Result};

/// Output format selected with `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Name,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(CliError::UnknownOutputFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Print Applications
///
/// In structured formats a single selected Application is printed as an
/// object, otherwise as a list.
pub fn write_applications(
    out: &mut dyn Write,
    format: OutputFormat,
    apps: &[&Application],
    single: bool,
) -> Result<()> {
    match format {
        OutputFormat::Name => {
            for app in apps {
                writeln!(out, "application/{}", app.name())?;
            }
            Ok(())
        }
        _ if single => match apps.first() {
            Some(app) => write_structured(out, format, app),
            None => Ok(()),
        },
        _ => write_structured(out, format, apps),
    }
}

/// Print rendered resources, grouped by lowercase kind
///
/// `name` output groups per Application with a blank line between groups;
/// structured output is a single list over all Applications.
pub fn write_resources(
    out: &mut dyn Write,
    format: OutputFormat,
    rendered: Vec<(String, Vec<Resource>)>,
) -> Result<()> {
    match format {
        OutputFormat::Name => {
            let mut first_group = true;
            for (_app, resources) in rendered {
                for (kind, group) in group_by_kind(resources) {
                    if !first_group {
                        writeln!(out)?;
                    }
                    first_group = false;
                    for resource in &group {
                        writeln!(out, "{}/{}", kind, resource.name())?;
                    }
                }
            }
            Ok(())
        }
        _ => {
            let all: Vec<Resource> = rendered
                .into_iter()
                .flat_map(|(_, resources)| resources)
                .collect();
            let ordered: Vec<Resource> = group_by_kind(all).into_values().flatten().collect();
            write_structured(out, format, &ordered)
        }
    }
}

fn write_structured<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    format: OutputFormat,
    value: &T,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            out.write_all(serde_yaml::to_string(value)?.as_bytes())?;
        }
        OutputFormat::Name => {}
    }
    Ok(())
}
