//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputMode};
use crate::config::{load_config, parse_header, ClientConfig};
use crate::error::{Error, Result};
use crate::http::{BlockingHttpClient, HttpClient};
use crate::pager::{AsyncPager, SyncPager};
use crate::pagination::{json_parser, PagerState};
use crate::types::{Direction, JsonValue};
use serde_json::json;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::info;

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
            Commands::Walk {
                url,
                backward,
                output,
                max_pages,
                blocking,
            } => {
                let walk = Walk {
                    url: url.clone(),
                    direction: if *backward {
                        Direction::Backward
                    } else {
                        Direction::Forward
                    },
                    output: *output,
                    max_pages: *max_pages,
                };
                let config = self.client_config()?;
                if *blocking {
                    walk_blocking(walk, config).await
                } else {
                    walk_async(walk, config).await
                }
            }
            Commands::ShowConfig => self.show_config(),
        }
    }

    /// Config file (if any) with `-H` headers layered on top
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        for raw in &self.cli.headers {
            let (name, value) = parse_header(raw)?;
            config.set_header(name, value);
        }

        config.validate()?;
        Ok(config)
    }

    fn show_config(&self) -> Result<()> {
        let mut config = self.client_config()?;
        for value in config.headers.values_mut() {
            *value = "***".to_string();
        }
        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }
}

async fn walk_async(walk: Walk, config: ClientConfig) -> Result<()> {
    let client = HttpClient::with_config(config.to_http_config())?;
    info!(url = %walk.url, direction = %walk.direction, "walking");

    let pager = AsyncPager::<JsonValue>::open(&walk.url, Arc::new(client), json_parser()).await?;
    let stdout = io::stdout();
    let pages = walk.run_async(pager, &mut stdout.lock()).await?;

    info!(pages, "walk finished");
    Ok(())
}

async fn walk_blocking(walk: Walk, config: ClientConfig) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let client = BlockingHttpClient::with_config(config.to_http_config())?;
        info!(url = %walk.url, direction = %walk.direction, "walking (blocking)");

        let pager = SyncPager::<JsonValue>::open(&walk.url, Arc::new(client), json_parser())?;
        let stdout = io::stdout();
        let pages = walk.run_blocking(pager, &mut stdout.lock())?;

        info!(pages, "walk finished");
        Ok::<(), Error>(())
    })
    .await
    .map_err(|e| Error::Other(format!("blocking walk failed to complete: {e}")))?
}

/// One `walk` invocation
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    pub(crate) url: String,
    pub(crate) direction: Direction,
    pub(crate) output: OutputMode,
    pub(crate) max_pages: Option<NonZeroUsize>,
}

impl Walk {
    /// Print pages from `pager` until the cursor runs out; returns pages visited
    pub(crate) async fn run_async<W: Write>(
        &self,
        mut pager: AsyncPager<JsonValue>,
        out: &mut W,
    ) -> Result<usize> {
        let mut visited = 0;
        loop {
            visited += 1;
            self.emit(pager.state(), visited, out)?;
            if self.limit_reached(visited) || !pager.state().has(self.direction) {
                return Ok(visited);
            }
            pager.navigate(self.direction).await?;
        }
    }

    /// Blocking form of [`run_async`](Self::run_async)
    pub(crate) fn run_blocking<W: Write>(
        &self,
        mut pager: SyncPager<JsonValue>,
        out: &mut W,
    ) -> Result<usize> {
        let mut visited = 0;
        loop {
            visited += 1;
            self.emit(pager.state(), visited, out)?;
            if self.limit_reached(visited) || !pager.state().has(self.direction) {
                return Ok(visited);
            }
            pager.navigate(self.direction)?;
        }
    }

    fn limit_reached(&self, visited: usize) -> bool {
        self.max_pages.is_some_and(|max| visited >= max.get())
    }

    fn emit<W: Write>(
        &self,
        state: &PagerState<JsonValue>,
        number: usize,
        out: &mut W,
    ) -> Result<()> {
        match self.output {
            OutputMode::Items => {
                for item in state.items() {
                    writeln!(out, "{}", serde_json::to_string(item)?)?;
                }
            }
            OutputMode::Pages => {
                let summary = json!({
                    "page": number,
                    "items": state.items().len(),
                    "next": state.cursor(Direction::Forward),
                    "previous": state.cursor(Direction::Backward),
                });
                writeln!(out, "{summary}")?;
            }
        }
        Ok(())
    }
}
