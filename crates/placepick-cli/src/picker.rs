//! Picker command handlers for the CLI.
//!
//! Every command builds a [`SelectionSession`] over the configured places
//! file and drives it the way an interactive surface would: present, load
//! candidates, then pick or dismiss. The outcome is awaited through an
//! [`OutcomeChannel`] and printed.

use std::sync::Arc;

use anyhow::Context;
use placepick_core::{load_places, AppConfig, PickerConfiguration, PlaceEntity, RawPlaceData};
use placepick_session::{
    Outcome, OutcomeChannel, PickerError, PresentationSurface, SearchQuery, SelectionSession,
    StaticDataSource,
};
use tokio::sync::oneshot;

/// Prints candidates to stdout as a numbered table.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TerminalSurface;

impl PresentationSurface for TerminalSurface {
    fn present(&self, configuration: &PickerConfiguration) {
        match &configuration.viewport {
            Some(viewport) => println!("searching near {} ({viewport})", viewport.center()),
            None => println!("searching all places"),
        }
    }

    fn render(&self, candidates: &[RawPlaceData]) {
        if candidates.is_empty() {
            println!("no candidates found");
            return;
        }
        println!("{:<5}{:<14}{:<32}ADDRESS", "#", "ID", "NAME");
        for (index, candidate) in candidates.iter().enumerate() {
            println!(
                "{:<5}{:<14}{:<32}{}",
                index,
                candidate.identifier.as_deref().unwrap_or("-"),
                truncate(candidate.name.as_deref().unwrap_or("(unnamed)"), 30),
                candidate.formatted_address.as_deref().unwrap_or("")
            );
        }
        for line in attribution_footer(candidates) {
            println!("data: {line}");
        }
    }
}

/// Distinct attribution notices for `candidates`, in first-seen order.
fn attribution_footer(candidates: &[RawPlaceData]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for attributions in candidates.iter().filter_map(|c| c.attributions.as_ref()) {
        let line = attributions.to_string();
        if !lines.contains(&line) {
            lines.push(line);
        }
    }
    lines
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

type CliSession = SelectionSession<StaticDataSource, TerminalSurface>;

struct OpenSession {
    session: CliSession,
    // Held so the notifier's weak reference stays upgradable.
    _channel: Arc<OutcomeChannel>,
    outcome: oneshot::Receiver<Outcome>,
}

fn data_source(config: &AppConfig) -> anyhow::Result<StaticDataSource> {
    let file = load_places(&config.places_path).with_context(|| {
        format!(
            "failed to load places from {}",
            config.places_path.display()
        )
    })?;
    tracing::debug!(count = file.places.len(), "places loaded");
    Ok(StaticDataSource::from(file))
}

/// Builds a session, starts it and loads the first page of candidates.
async fn open_session(
    config: &AppConfig,
    query: Option<&str>,
    limit: usize,
) -> anyhow::Result<OpenSession> {
    let session = SelectionSession::with_config(
        data_source(config)?,
        TerminalSurface,
        config.picker_configuration(),
    )?;
    let (channel, outcome) = OutcomeChannel::new();
    session.register_observer(&channel);
    session.start()?;

    let mut search = SearchQuery::new(limit);
    if let Some(text) = query {
        search = search.with_text(text);
    }
    let transition = session.load_candidates(search).await?;
    tracing::debug!(?transition, "candidates loaded");

    Ok(OpenSession {
        session,
        _channel: channel,
        outcome,
    })
}

/// Waits for the session outcome and prints it.
///
/// # Errors
///
/// Returns an error if the session failed or ended without reporting.
async fn finish(open: OpenSession, json: bool) -> anyhow::Result<()> {
    let outcome = open
        .outcome
        .await
        .context("picker session ended without an outcome")?;
    match outcome {
        Outcome::Picked(place) => print_place(&place, json),
        Outcome::Cancelled => {
            println!("picker dismissed; nothing picked");
            Ok(())
        }
        Outcome::Failed(error) => {
            let retriable = matches!(&error, PickerError::DataSource(e) if e.is_transient());
            tracing::warn!(retriable, error = %error, "picker session failed");
            Err(anyhow::Error::new(error).context("picker session failed"))
        }
    }
}

fn print_place(place: &PlaceEntity, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(place)?);
    } else {
        println!("{place}");
    }
    Ok(())
}

/// Show the candidates for `query`, then tear the picker down.
///
/// # Errors
///
/// Returns an error if the places file cannot be loaded or the search fails.
pub(crate) async fn run_list(
    config: &AppConfig,
    query: Option<&str>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let open = open_session(config, query, limit.unwrap_or(config.search_limit)).await?;
    if open.session.state().is_terminal() {
        return finish(open, false).await;
    }
    open.session.cancel()?;
    Ok(())
}

/// Pick the candidate at `index` and print the resulting place.
///
/// # Errors
///
/// Returns an error if `index` is out of range, the place fails validation,
/// or the data source fails.
pub(crate) async fn run_pick(
    config: &AppConfig,
    index: usize,
    query: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let open = open_session(config, query, config.search_limit).await?;
    if !open.session.state().is_terminal() {
        if let Err(err) = open.session.pick(index).await {
            open.session.cancel()?;
            return Err(err.into());
        }
    }
    finish(open, json).await
}

/// Present the picker and dismiss it without choosing.
///
/// # Errors
///
/// Returns an error if the places file cannot be loaded or the search fails.
pub(crate) async fn run_dismiss(config: &AppConfig) -> anyhow::Result<()> {
    let open = open_session(config, None, config.search_limit).await?;
    if !open.session.state().is_terminal() {
        open.session.dismiss()?;
    }
    finish(open, false).await
}

/// Validate every entry in the places file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or any entry is invalid.
pub(crate) fn run_check(config: &AppConfig) -> anyhow::Result<()> {
    let file = load_places(&config.places_path).with_context(|| {
        format!(
            "failed to load places from {}",
            config.places_path.display()
        )
    })?;

    let mut invalid = 0usize;
    for (index, raw) in file.places.iter().enumerate() {
        let label = raw
            .identifier
            .clone()
            .or_else(|| raw.name.clone())
            .unwrap_or_else(|| format!("#{index}"));
        if let Err(error) = PlaceEntity::from_raw(raw.clone()) {
            invalid += 1;
            println!("invalid  {label}: {error}");
        }
    }

    println!(
        "{} places checked, {invalid} invalid",
        file.places.len()
    );
    if invalid > 0 {
        anyhow::bail!("{invalid} invalid places in {}", config.places_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use placepick_core::place::Attributions;

    use super::*;

    fn attributed(text: &str) -> RawPlaceData {
        RawPlaceData {
            attributions: Some(Attributions {
                text: text.to_string(),
                links: vec![],
            }),
            ..RawPlaceData::at(37.4, -122.1)
        }
    }

    #[test]
    fn attribution_footer_dedupes_in_first_seen_order() {
        let candidates = vec![
            attributed("Listing data by Example Maps"),
            RawPlaceData::at(37.5, -122.2),
            attributed("Reviews by Local Guide"),
            attributed("Listing data by Example Maps"),
        ];
        assert_eq!(
            attribution_footer(&candidates),
            ["Listing data by Example Maps", "Reviews by Local Guide"]
        );
    }

    #[test]
    fn attribution_footer_empty_without_attributions() {
        assert!(attribution_footer(&[RawPlaceData::at(0.0, 0.0)]).is_empty());
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Cafe", 30), "Cafe");
    }

    #[test]
    fn truncate_shortens_long_text_on_char_boundary() {
        let long = "Café ".repeat(10);
        let shortened = truncate(&long, 10);
        assert_eq!(shortened.chars().count(), 10);
        assert!(shortened.ends_with("..."));
    }
}
