//! CLI runner - executes commands

use crate::api::{
    AddressTransactionsSource, ApiRegistry, BlockTransactionsSource, BlocksSource, ExplorerApi,
    TokenTransfersSource, TokensSource,
};
use crate::cli::commands::{Cli, Commands, OutputFormat, Resource};
use crate::cli::server::{serve, AppState};
use crate::config::ExplorerConfig;
use crate::error::{Error, Result};
use crate::pagination::{Cursor, Page, PageSource};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

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
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Serve { port } => {
                let port = port.unwrap_or(config.server.port);
                serve(AppState::new(config)?, port).await
            }
            Commands::Latest => self.latest(&config).await,
            Commands::Page {
                resource,
                query,
                id,
            } => self.page(&config, *resource, query, id.as_deref()).await,
            Commands::Config => {
                print!("{}", config.to_yaml()?);
                Ok(())
            }
        }
    }

    /// Load the configuration file (or defaults) with env and flag overrides
    fn load_config(&self) -> Result<ExplorerConfig> {
        let config = match &self.cli.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration");
                ExplorerConfig::load(path)?
            }
            None => ExplorerConfig::default(),
        };

        let config = config
            .with_env_overrides()
            .with_overrides(self.cli.network.clone(), None);
        config.validate()?;
        Ok(config)
    }

    /// Client for the default network
    fn api(config: &ExplorerConfig) -> Result<Arc<ExplorerApi>> {
        let registry = ApiRegistry::from_config(config)?;
        registry
            .get(&config.default_network)
            .ok_or_else(|| Error::unknown_network(&config.default_network))
    }

    async fn latest(&self, config: &ExplorerConfig) -> Result<()> {
        let api = Self::api(config)?;
        if self.cli.verbose {
            info!(network = api.network(), "Fetching latest blocks and transactions");
        }

        let (blocks, transactions) =
            futures::try_join!(api.latest_blocks(), api.latest_transactions())?;
        self.output_message(&json!({
            "network": api.network(),
            "blocks": blocks,
            "transactions": transactions,
        }));
        Ok(())
    }

    async fn page(
        &self,
        config: &ExplorerConfig,
        resource: Resource,
        query: &str,
        id: Option<&str>,
    ) -> Result<()> {
        let api = Self::api(config)?;
        let cursor = Cursor::from_query_str(query).without_network();

        let id = match (resource.needs_id(), id) {
            (true, Some(id)) => id.to_string(),
            (true, None) => {
                return Err(Error::config(format!(
                    "{} requires --id",
                    resource_name(resource)
                )))
            }
            (false, _) => String::new(),
        };

        if self.cli.verbose {
            info!(
                network = api.network(),
                resource = resource_name(resource),
                page = cursor.page_number(),
                "Fetching page"
            );
        }

        let output = match resource {
            Resource::Blocks => fetch(BlocksSource::new(api), &cursor).await?,
            Resource::BlockTransactions => {
                fetch(BlockTransactionsSource::new(api, id), &cursor).await?
            }
            Resource::AddressTransactions => {
                fetch(AddressTransactionsSource::new(api, id), &cursor).await?
            }
            Resource::Tokens => fetch(TokensSource::new(api), &cursor).await?,
            Resource::TokenTransfers => fetch(TokenTransfersSource::new(api, id), &cursor).await?,
        };

        self.output_message(&output);
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

/// Fetch one page and shape it for output
///
/// `next_page_params` is printed with the following `page_number` already
/// set, so it can be passed straight back as `--query`.
async fn fetch<S>(source: S, cursor: &Cursor) -> Result<Value>
where
    S: PageSource,
    S::Item: Serialize,
{
    let Page {
        items,
        next_page_params,
    } = source.fetch_page(cursor).await?;
    let next = next_page_params
        .zip(cursor.page_number().checked_add(1))
        .map(|(next, n)| next.with_page_number(n));
    let next_query = next.as_ref().map(Cursor::to_query_string);

    Ok(json!({
        "items": serde_json::to_value(items)?,
        "next_page_params": next,
        "next_query": next_query,
    }))
}

fn resource_name(resource: Resource) -> &'static str {
    match resource {
        Resource::Blocks => "blocks",
        Resource::BlockTransactions => "block-transactions",
        Resource::AddressTransactions => "address-transactions",
        Resource::Tokens => "tokens",
        Resource::TokenTransfers => "token-transfers",
    }
}
