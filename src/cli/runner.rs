//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ListConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpPageSource;
use crate::list::{Footer, InfiniteList, ListView};
use crate::pagination::{fetcher_fn, LoadOutcome, PageFetcher};
use crate::scroll::ScrollMetrics;
use crate::types::{JsonValue, PageNumber};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings of a `simulate` run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulateOptions {
    /// Total pages served
    pub pages: PageNumber,
    /// Items per page
    pub per_page: u32,
    /// Page whose first fetch fails
    pub fail_page: Option<PageNumber>,
    /// Viewport height
    pub viewport: f64,
    /// Height of one row
    pub row_height: f64,
    /// Distance scrolled per step
    pub step: f64,
    /// Simulated fetch latency
    pub latency: Duration,
}

impl SimulateOptions {
    fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(Error::invalid_value("step", "must be a positive number"));
        }
        if !(self.viewport.is_finite() && self.viewport >= 0.0) {
            return Err(Error::invalid_value("viewport", "must be a non-negative number"));
        }
        if !(self.row_height.is_finite() && self.row_height >= 0.0) {
            return Err(Error::invalid_value("row_height", "must be a non-negative number"));
        }
        Ok(())
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Simulate {
                pages,
                per_page,
                fail_page,
                viewport,
                row_height,
                step,
                latency_ms,
            } => {
                self.simulate(SimulateOptions {
                    pages: *pages,
                    per_page: *per_page,
                    fail_page: *fail_page,
                    viewport: *viewport,
                    row_height: *row_height,
                    step: *step,
                    latency: Duration::from_millis(*latency_ms),
                })
                .await
            }
            Commands::Fetch { config, max_pages } => self.fetch(config, *max_pages).await,
        }
    }

    /// Scroll a simulated viewport until every page is loaded.
    ///
    /// A failed page is retried once straight away; a second failure ends the run.
    pub async fn simulate(&self, options: SimulateOptions) -> Result<()> {
        options.validate()?;

        let SimulateOptions {
            per_page,
            fail_page,
            latency,
            ..
        } = options;
        let failed_once = Arc::new(AtomicBool::new(false));
        let fetcher = fetcher_fn(move |page: PageNumber| {
            let failed_once = Arc::clone(&failed_once);
            async move {
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                if fail_page == Some(page) && !failed_once.swap(true, Ordering::SeqCst) {
                    return Err(Error::fetch(format!("page {page} unavailable")));
                }
                let first = page.saturating_sub(1).saturating_mul(per_page);
                Ok((first..first.saturating_add(per_page))
                    .map(|n| format!("Item {}", n + 1))
                    .collect::<Vec<String>>())
            }
        });

        let config = ListConfig::new()
            .with_items_per_page(per_page)
            .with_total_pages(options.pages);
        let list = InfiniteList::new(config, fetcher);
        let mut metrics = ScrollMetrics::new(options.viewport);

        let initial = list.attach();
        self.output_message(&event_message("attached", None, &list, &metrics));
        let outcome = initial
            .await
            .map_err(|e| Error::Other(format!("Initial load task failed: {e}")))?;
        self.report_outcome(&list, &metrics, &outcome).await?;

        while list.state().has_more_pages() {
            metrics.set_content_extent(list.state().len() as f64 * options.row_height);
            metrics.scroll_by(options.step);

            let Some(outcome) = list.on_scroll(metrics.position()).await else {
                debug!(offset = metrics.offset(), "Scrolled without reaching the trigger");
                continue;
            };
            self.report_outcome(&list, &metrics, &outcome).await?;
        }

        metrics.set_content_extent(list.state().len() as f64 * options.row_height);
        self.output_message(&event_message("done", None, &list, &metrics));
        info!(
            items = list.state().len(),
            pages = options.pages,
            "Simulation finished"
        );
        Ok(())
    }

    /// Print an outcome, retrying a failure once
    async fn report_outcome(
        &self,
        list: &InfiniteList<String>,
        metrics: &ScrollMetrics,
        outcome: &LoadOutcome,
    ) -> Result<()> {
        self.output_message(&event_message(
            outcome_event(outcome),
            Some(outcome),
            list,
            metrics,
        ));

        if let LoadOutcome::Failed { page, error } = outcome {
            warn!(page, %error, "Page failed, retrying once");
            let retry = list.load_more().await;
            self.output_message(&event_message("retry", Some(&retry), list, metrics));
            if let LoadOutcome::Failed { page, error } = retry {
                return Err(Error::fetch(format!("page {page} failed twice: {error}")));
            }
        }
        Ok(())
    }

    /// Page through the configured API and print every record
    pub async fn fetch(&self, config_path: &Path, max_pages: Option<PageNumber>) -> Result<()> {
        let config = load_config(config_path)
            .with_context(|| format!("Loading {}", config_path.display()))?;
        let source_config = config.require_source()?;
        let source = Arc::new(HttpPageSource::new(
            source_config,
            config.list.items_per_page,
        )?);

        let mut list = InfiniteList::with_shared_fetcher(
            config.list.clone(),
            Arc::clone(&source) as Arc<dyn PageFetcher<JsonValue>>,
        );

        let max_pages = max_pages.unwrap_or(PageNumber::MAX);
        let mut pages_loaded = 0;
        let mut printed = 0;

        while pages_loaded < max_pages {
            let outcome = list.load_more().await;
            list.update_total_pages(source.last_total_pages());

            match outcome {
                LoadOutcome::Loaded { page, count } => {
                    pages_loaded += 1;
                    debug!(page, count, "Fetched page");
                    list.state().with_items(|items| {
                        for item in &items[printed..] {
                            self.output_message(item);
                        }
                    });
                    printed = list.state().len();
                }
                LoadOutcome::Failed { page, error } => {
                    return Err(Error::fetch(format!("page {page}: {error}")));
                }
                LoadOutcome::Skipped(reason) => {
                    debug!(?reason, "No more pages");
                    break;
                }
                LoadOutcome::Discarded { page } => {
                    warn!(page, "Fetch result discarded");
                    break;
                }
            }
        }

        info!(
            pages = pages_loaded,
            records = printed,
            total_pages = list.state().total_pages(),
            "Fetch finished"
        );
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn outcome_event(outcome: &LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Loaded { .. } => "loaded",
        LoadOutcome::Failed { .. } => "failed",
        LoadOutcome::Skipped(_) => "skipped",
        LoadOutcome::Discarded { .. } => "discarded",
    }
}

fn outcome_json(outcome: &LoadOutcome) -> Value {
    match outcome {
        LoadOutcome::Loaded { page, count } => json!({ "page": page, "count": count }),
        LoadOutcome::Failed { page, error } => json!({ "page": page, "error": error }),
        LoadOutcome::Skipped(reason) => json!({ "reason": format!("{reason:?}") }),
        LoadOutcome::Discarded { page } => json!({ "page": page }),
    }
}

/// One line of simulation output: the event, the pagination counters and the rendered view
pub(crate) fn event_message(
    event: &str,
    outcome: Option<&LoadOutcome>,
    list: &InfiniteList<String>,
    metrics: &ScrollMetrics,
) -> Value {
    let state = list.state();
    json!({
        "event": event,
        "outcome": outcome.map(outcome_json),
        "offset": metrics.offset(),
        "max_offset": metrics.max_offset(),
        "current_page": state.current_page(),
        "total_pages": state.total_pages(),
        "items": state.len(),
        "is_loading": state.is_loading(),
        "error": state.error(),
        "view": view_json(&list.render(&|item: &String| item.clone())),
    })
}

/// JSON form of a rendered view
pub(crate) fn view_json(view: &ListView<String>) -> Value {
    match view {
        ListView::Loading { placeholder } => {
            json!({ "kind": "loading", "placeholder": placeholder })
        }
        ListView::Error {
            message,
            placeholder,
        } => json!({ "kind": "error", "message": message, "placeholder": placeholder }),
        ListView::Empty { placeholder } => json!({ "kind": "empty", "placeholder": placeholder }),
        ListView::Items { rows, footer } => json!({
            "kind": "items",
            "rows": rows,
            "footer": match footer {
                None => Value::Null,
                Some(Footer::Loading) => json!("loading"),
                Some(Footer::Error(message)) => json!({ "error": message }),
            },
        }),
    }
}
