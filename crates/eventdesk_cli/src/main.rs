//! CLI probe for the document core.
//!
//! # Responsibility
//! - Load settings, start logging, and seed one in-memory store.
//! - Print each document's history and pointer integrity deterministically.
//!
//! Usage: `eventdesk_cli [config.json]`

use eventdesk_core::seed::demo_documents;
use eventdesk_core::{
    init_logging, AppConfig, DocumentRepository, DocumentStore, VersionService,
};
use log::info;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("eventdesk_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(Path::new(&path))?,
        None => AppConfig::default(),
    };
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let mut store = DocumentStore::new();
    match &config.seed_path {
        Some(seed_path) => {
            let raw = std::fs::read_to_string(seed_path)?;
            store.load_json(&raw)?;
        }
        None => store.set_documents(demo_documents()),
    }
    info!(
        "event=cli_start module=cli status=ok documents={}",
        store.len()
    );

    println!("eventdesk_core version={}", eventdesk_core::core_version());
    let service = VersionService::new(store);
    for document in service.repo().documents() {
        println!(
            "{} [{}] {} current={}",
            document.id, document.status, document.title, document.current_version
        );
        for version in document.sorted_versions() {
            let marker = if version.version == document.current_version {
                '*'
            } else {
                ' '
            };
            println!(
                "  {marker} {} {} by {} ({} comments)",
                version.version,
                version.status,
                version.created_by,
                version.comments.len()
            );
        }
    }

    for report in service.integrity_problems() {
        if let Some(label) = &report.dangling_current {
            println!("warning: {} points at missing version {label}", report.document_id);
        }
        for label in &report.duplicate_labels {
            println!("warning: {} has duplicate label {label}", report.document_id);
        }
    }
    Ok(())
}
