//! CLI command implementations
//!
//! - serve: check the document once, then serve the API until Ctrl+C
//! - init: write the canonical empty document
//! - export: render the document to an RTF file in a directory

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::export::export_document;
use crate::http_server::HttpServer;
use crate::observability::{log_event_with_fields, Event};
use crate::store::{Document, DocumentStore};

use super::args::{Command, ConfigArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { common, host, port } => serve(&common, host, port),
        Command::Init { common } => init(&common),
        Command::Export {
            common,
            output,
            name,
        } => export(&common, &output, name.as_deref()).map(|path| {
            println!("{}", path.display());
        }),
    }
}

/// Serve the entity API.
pub fn serve(common: &ConfigArgs, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::resolve(common)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let store = Arc::new(DocumentStore::new(&config.data_file));
    // Boot-time check: surfaces a missing or corrupt document in the log
    // before the first request does.
    let doc = store.load();
    log_config(&config, &doc);

    let server = HttpServer::new(config.server, store);
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("failed to start runtime: {}", e)))?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Write the canonical empty document; refuses to overwrite.
pub fn init(common: &ConfigArgs) -> CliResult<()> {
    let config = Config::resolve(common)?;
    let store = DocumentStore::new(&config.data_file);
    if !store.initialize()? {
        return Err(CliError::already_initialized(store.path()));
    }
    Ok(())
}

/// Render the export into `output`; returns the written file's path.
pub fn export(common: &ConfigArgs, output: &Path, name: Option<&str>) -> CliResult<PathBuf> {
    let config = Config::resolve(common)?;
    let store = DocumentStore::new(&config.data_file);

    let export = export_document(&store.load(), name, Local::now().naive_local());

    fs::create_dir_all(output)?;
    let path = output.join(&export.filename);
    fs::write(&path, &export.bytes)?;

    log_event_with_fields(
        Event::ExportRendered,
        &[
            ("bytes", export.bytes.len().to_string().as_str()),
            ("filename", export.filename.as_str()),
        ],
    );
    Ok(path)
}

fn log_config(config: &Config, doc: &Document) {
    let data_file = config.data_file.display().to_string();
    let items = doc.item_count().to_string();
    let port = config.server.port.to_string();
    let cors = if config.server.is_permissive() {
        "any".to_string()
    } else {
        config.server.cors_origins.join(",")
    };
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("cors_origins", cors.as_str()),
            ("data_file", data_file.as_str()),
            ("host", config.server.host.as_str()),
            ("items", items.as_str()),
            ("port", port.as_str()),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(tmp: &TempDir) -> ConfigArgs {
        ConfigArgs {
            config: None,
            data_file: Some(tmp.path().join("requirements_data.json")),
        }
    }

    #[test]
    fn test_init_creates_then_refuses() {
        let tmp = TempDir::new().unwrap();
        let args = args_for(&tmp);

        init(&args).unwrap();
        assert!(tmp.path().join("requirements_data.json").exists());

        let err = init(&args).unwrap_err();
        assert_eq!(err.code_str(), "REQAI_CLI_ALREADY_INITIALIZED");
    }

    #[test]
    fn test_export_writes_file() {
        let tmp = TempDir::new().unwrap();
        let args = args_for(&tmp);
        let out = tmp.path().join("exports");

        let path = export(&args, &out, Some("q3 review")).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("q3review_"));
        assert!(name.ends_with(".rtf"));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"{\\rtf1"));
    }
}
