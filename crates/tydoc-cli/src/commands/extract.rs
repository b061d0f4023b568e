//! Extract command implementation.
//!
//! Binds the configured sources, walks them and writes the documentation
//! model as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};
use tydoc::{extract, to_json};
use tydoc_binder::Binder;
use tydoc_config::{ConfigDiscovery, DocsConfig, validate};

use crate::cli::ExtractArgs;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Load the layered configuration, with command-line flags on top.
pub fn load_config(args: &ExtractArgs) -> Result<DocsConfig> {
    let cwd = working_dir(args)?;
    let mut discovery = ConfigDiscovery::new(&cwd).with_overrides(overrides(args));
    if let Some(path) = &args.config {
        discovery = discovery.with_file(cwd.join(path));
    }
    Ok(discovery.load()?)
}

/// Execute the extract command.
///
/// # Errors
///
/// Returns errors for invalid configuration, unreadable or unparsable
/// sources, alias cycles and failures writing the output.
pub fn execute(args: &ExtractArgs, config: DocsConfig) -> Result<()> {
    validate(&config).with_hint("pass source files or set 'sources' in tydoc.toml")?;
    let cwd = working_dir(args)?;

    let mut binder = Binder::new();
    for source in &config.sources {
        let text = fs::read_to_string(cwd.join(source)).with_path(source)?;
        binder.add_source(source, text)?;
    }
    if let Some(layout) = config.layout() {
        binder.with_layout(layout);
    }

    let program = binder.bind()?;
    let options = config.extract_options()?;
    debug!(?options, "extracting");

    let mut docs = extract(&program, &options)?;
    if !args.keep_empty {
        docs.discard_empty_modules();
    }
    info!(
        modules = docs.modules.len(),
        classes = docs.classes.len(),
        enums = docs.enums.len(),
        "extracted documentation"
    );

    let json = to_json(&docs, config.pretty)?;
    match &config.output {
        Some(output) => {
            let path = cwd.join(output);
            write_output(&path, &json)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn working_dir(args: &ExtractArgs) -> Result<PathBuf> {
    match &args.cwd {
        Some(cwd) => Ok(cwd.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    fs::write(path, json).with_path(path)
}

/// Config keys set on the command line. Absent flags leave the key out so
/// lower layers still apply.
fn overrides(args: &ExtractArgs) -> Value {
    let mut map = Map::new();
    if !args.files.is_empty() {
        map.insert("sources".into(), paths(&args.files));
    }
    if !args.include.is_empty() {
        map.insert("include".into(), args.include.clone().into());
    }
    if !args.exclude.is_empty() {
        map.insert("exclude".into(), args.exclude.clone().into());
    }
    if let Some(extension) = &args.extension {
        map.insert("extension".into(), extension.clone().into());
    }
    if let Some(out) = &args.out {
        map.insert("output".into(), out.to_string_lossy().into_owned().into());
    }
    if args.compact {
        map.insert("pretty".into(), false.into());
    }
    Value::Object(map)
}

fn paths(paths: &[PathBuf]) -> Value {
    paths
        .iter()
        .map(|path| Value::from(path.to_string_lossy().into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_only_carry_given_flags() {
        assert_eq!(overrides(&ExtractArgs::default()), json!({}));

        let args = ExtractArgs {
            files: vec![PathBuf::from("src/index.ts")],
            exclude: vec!["internal".into()],
            compact: true,
            ..ExtractArgs::default()
        };
        assert_eq!(
            overrides(&args),
            json!({
                "sources": ["src/index.ts"],
                "exclude": ["internal"],
                "pretty": false
            })
        );
    }
}
