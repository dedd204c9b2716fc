//! Handler for `maktaba search`.

use std::fmt::Write as _;
use std::sync::Arc;

use maktaba_core::{Error, Result};
use maktaba_search::{
    SearchBackend, SearchOutcome, SearchService, StaticBackend, TypesenseBackend,
};

use crate::cli::SearchArgs;
use crate::config::MaktabaConfig;

/// Run a search and print the outcome.
pub async fn cmd_search(config: MaktabaConfig, args: &SearchArgs) -> Result<()> {
    let output = run_search(config, args).await?;
    print!("{output}");
    Ok(())
}

/// Run a search and render the outcome as text or JSON.
pub async fn run_search(config: MaktabaConfig, args: &SearchArgs) -> Result<String> {
    let config = config.with_overrides(args.url.as_deref(), args.api_key.as_deref());
    let backend = build_backend(&config, args)?;
    let service = SearchService::new(backend, config.search);

    let query = service.prepare(args.to_params(), args.domain)?;

    if args.dry_run {
        let request = service.provider_request(&query);
        return Ok(format!("{}\n", serde_json::to_string_pretty(&request)?));
    }

    let outcome = service.search_or_degraded(&query).await?;
    if let Some(notice) = outcome.notice() {
        log::warn!("{notice}");
    }

    if args.json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&outcome)?))
    } else {
        Ok(render_text(&outcome))
    }
}

fn build_backend(config: &MaktabaConfig, args: &SearchArgs) -> Result<Arc<dyn SearchBackend>> {
    match &args.fixture {
        Some(path) => {
            log::info!("Answering from fixture {path}");
            let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
            Ok(Arc::new(StaticBackend::from_json(&json)?))
        }
        None => {
            log::debug!("Using Typesense at {}", config.typesense.url);
            Ok(Arc::new(TypesenseBackend::new(config.typesense.clone())?))
        }
    }
}

/// Human-readable rendering: one section per group, then facets and paging.
pub fn render_text(outcome: &SearchOutcome) -> String {
    let result = outcome.result();
    let mut out = String::new();

    if let Some(notice) = outcome.notice() {
        let _ = writeln!(out, "! {notice}");
    }

    for group in result.groups() {
        let _ = writeln!(out, "== {} ({} found)", group.key, group.found);
        for hit in &group.hits {
            let title = hit.highlighted_title().unwrap_or("(untitled)");
            let url = hit.url().unwrap_or_else(|e| {
                log::error!("no url for {} hit: {e}", hit.content_type());
                String::new()
            });
            match hit.label() {
                Some(label) if Some(label) != hit.title() => {
                    let _ = writeln!(out, "  [{label}] {title}  {url}");
                }
                _ => {
                    let _ = writeln!(out, "  {title}  {url}");
                }
            }
        }
    }

    for (field, counts) in result.facets() {
        let values: Vec<String> = counts
            .iter()
            .map(|c| format!("{} ({})", c.value, c.count))
            .collect();
        let _ = writeln!(out, "-- {field}: {}", values.join(", "));
    }

    let _ = writeln!(
        out,
        "page {} of {} ({} total)",
        result.page(),
        result.total_pages(),
        result.total_found()
    );
    out
}
