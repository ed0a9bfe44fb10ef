//! Crawler session - owns the navigator and the session state
//!
//! A session ties together:
//! - The navigator and its transport
//! - Session-level default selections and the date range
//! - The history of fetched tables
//! - The random-walk and direct-path strategies

use crate::config::Config;
use crate::crawler::history::History;
use crate::navigator::Navigator;
use crate::node::{FolderListing, Node};
use crate::output::{TableOutput, TableSink};
use crate::query::{build_query, fetch, resolve_encodings};
use crate::resolver::{DateRange, ResolvedQuery, SelectorSet, SessionDefaults, VariableResolver};
use crate::transport::Transport;
use crate::{Result, StatError};
use encoding_rs::Encoding;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use url::Url;

/// Consecutive transport failures after which a random walk gives up
pub const MAX_CONSECUTIVE_FAILURES: u32 = 2;

/// One crawling session against a PXWeb database
pub struct Session {
    config: Config,
    navigator: Navigator,
    defaults: SessionDefaults,
    date_range: Option<DateRange>,
    history: History,
    encodings: Vec<&'static Encoding>,
}

impl Session {
    /// Creates a session with a transport built from the configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use statfin_crawler::{Config, SelectorSet, Session};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut session = Session::new(Config::default())?;
    /// let selectors = SelectorSet::new().with("Year", ["2016"]);
    /// if let Some(table) = session.walk_random(&selectors).await? {
    ///     println!("{} rows", table.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        let transport = Transport::from_config(&config.crawler)?;
        Self::with_transport(config, transport)
    }

    /// Creates a session over an existing transport
    pub fn with_transport(config: Config, transport: Transport) -> Result<Self> {
        let root = config.api.root_url()?;
        let date_range = DateRange::from_config(&config.date_range)?;

        let mut defaults = SessionDefaults::new();
        for (name, values) in &config.defaults {
            defaults.set(name.clone(), values.clone().into_vec());
        }

        let encodings = resolve_encodings(&config.crawler.fallback_encodings);

        Ok(Self {
            navigator: Navigator::new(transport, root),
            defaults,
            date_range,
            history: History::new(),
            encodings,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn root_url(&self) -> &Url {
        self.navigator.root_url()
    }

    /// URL of the current location
    pub fn url(&self) -> Url {
        self.navigator.url()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the navigator to the root
    pub fn to_start(&mut self) {
        self.navigator.reset();
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    /// Remembers a selection for every later table with a variable of this name
    pub fn set_default<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults.set(name, values);
    }

    pub fn clear_default(&mut self, name: &str) -> Option<Vec<String>> {
        self.defaults.remove(name)
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// Sets a half-open year range `start..end`
    pub fn set_year_range(&mut self, start: i32, end: i32) -> Result<()> {
        self.date_range = Some(DateRange::years(start, end)?);
        Ok(())
    }

    /// Sets a calendar range from two `dd.mm.yyyy` dates
    pub fn set_calendar_range(&mut self, start: &str, end: &str) -> Result<()> {
        self.date_range = Some(DateRange::calendar(start, end)?);
        Ok(())
    }

    pub fn clear_date_range(&mut self) {
        self.date_range = None;
    }

    /// Resolves selectors against the current table
    pub async fn resolve(&mut self, selectors: &SelectorSet) -> Result<ResolvedQuery> {
        let table = self.navigator.current().await?.as_table().cloned();
        let Some(table) = table else {
            return Err(StatError::InvalidState {
                location: self.navigator.location().to_string(),
                operation: "resolve variables of a folder",
            });
        };

        let resolver = VariableResolver::new(&self.defaults, self.date_range.as_ref());
        Ok(resolver.resolve_table(&table, selectors)?)
    }

    /// Resolves, queries and hands the current table to a sink
    pub async fn fetch_into<S: TableSink>(
        &mut self,
        selectors: &SelectorSet,
        sink: &S,
    ) -> Result<S::Output> {
        let resolved = self.resolve(selectors).await?;
        let title = self.navigator.title().unwrap_or_default().to_string();
        let query = build_query(&resolved, &self.config.output.format);
        let url = self.navigator.url();

        let dataset = fetch(self.navigator.transport(), &url, &query, &self.encodings).await?;
        tracing::info!("Fetched '{}': {} rows", title, dataset.len());

        self.history.record(title, url);
        Ok(sink.accept(dataset))
    }

    /// Fetches the current table in the configured output mode
    pub async fn fetch_table(&mut self, selectors: &SelectorSet) -> Result<TableOutput> {
        let mode = self.config.output.mode;
        self.fetch_into(selectors, &mode).await
    }

    /// Walks to a random table and fetches it
    ///
    /// Returns `Ok(None)` when the walk hits too many consecutive transport failures.
    pub async fn walk_random(&mut self, selectors: &SelectorSet) -> Result<Option<TableOutput>> {
        let mut rng = StdRng::from_entropy();
        self.walk_random_with(selectors, &mut rng).await
    }

    /// Random walk with a caller-supplied random source
    pub async fn walk_random_with<R: Rng>(
        &mut self,
        selectors: &SelectorSet,
        rng: &mut R,
    ) -> Result<Option<TableOutput>> {
        if self.navigator.is_at_table() {
            self.navigator.reset();
        }

        let mut failures = 0;
        loop {
            let at_table = self.navigator.current().await.map(Node::is_table);
            let step = match at_table {
                Ok(true) => break,
                Ok(false) => {
                    let choices = self
                        .navigator
                        .node()
                        .and_then(Node::as_folder)
                        .map(FolderListing::navigable_indices)
                        .unwrap_or_default();

                    let Some(&index) = choices.choose(&mut *rng) else {
                        return Err(StatError::DeadEnd {
                            location: self.navigator.location().to_string(),
                        });
                    };
                    self.navigator.move_to(index).await.map(|_| ())
                }
                Err(e) => Err(e),
            };

            match step {
                Ok(()) => failures = 0,
                Err(e) if e.is_transient() => {
                    failures += 1;
                    tracing::warn!(
                        "Error occurred: {} (options: {:?})",
                        e,
                        self.navigator.options()
                    );
                    if failures >= MAX_CONSECUTIVE_FAILURES {
                        tracing::warn!(
                            "Giving up random walk after {} consecutive failures",
                            failures
                        );
                        return Ok(None);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Random walk reached {}", self.navigator.url());
        self.fetch_table(selectors).await.map(Some)
    }

    /// Jumps straight to a table path and fetches it
    pub async fn walk_to(&mut self, path: &str, selectors: &SelectorSet) -> Result<TableOutput> {
        self.navigator.set_path(path).await?;
        self.fetch_table(selectors).await
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "*".repeat(80);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Root URL:             {}", self.root_url())?;
        writeln!(f, "Current URL:          {}", self.url())?;
        writeln!(f, "Tables gone through:  {}", self.history.titles().join(", "))?;
        writeln!(
            f,
            "Request interval:     {:?}",
            self.navigator.transport().pause()
        )?;
        writeln!(f, "Output mode:          {}", self.config.output.mode.as_str())?;
        write!(f, "{}", rule)
    }
}
