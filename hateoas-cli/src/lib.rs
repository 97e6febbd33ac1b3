//! Argument handling and request execution for `hateoas-cli`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use hateoas_client::ResourceService;
use hateoas_model::TypeRegistry;
use hateoas_types::{ClientConfig, PageParams, RequestOptions, SortOrder};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hateoas-cli")]
#[command(about = "Fetch and materialize resources from a HAL API")]
pub struct Args {
    /// Resource name, e.g. `books`
    pub resource: String,

    /// API root URL (overrides the config file)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Proxy URL substituted for the root in generated URLs
    #[arg(long)]
    pub proxy: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fetch a single resource by id
    #[arg(long)]
    pub id: Option<String>,

    /// Page number (zero based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long)]
    pub size: Option<u32>,

    /// Sort criterion as `path,ASC|DESC`; repeatable
    #[arg(long, value_parser = parse_sort)]
    pub sort: Vec<SortArg>,

    /// Projection name
    #[arg(long)]
    pub projection: Option<String>,

    /// Skip the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// One `--sort` criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    pub path: String,
    pub order: SortOrder,
}

/// Parses `path,DIRECTION`; the direction defaults to ascending.
pub fn parse_sort(raw: &str) -> Result<SortArg> {
    let (path, order) = match raw.split_once(',') {
        Some((path, order)) => (path, order.parse::<SortOrder>().map_err(anyhow::Error::msg)?),
        None => (raw, SortOrder::Asc),
    };
    if path.trim().is_empty() {
        bail!("sort path must not be empty");
    }
    Ok(SortArg {
        path: path.trim().to_string(),
        order,
    })
}

impl Args {
    /// Configuration from the file (when given) with command-line overrides.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                ClientConfig::parse_toml_str(&source)
                    .with_context(|| format!("invalid configuration in {}", path.display()))?
            }
            None => ClientConfig::default(),
        };
        if let Some(root) = &self.root {
            config.api_root_url = root.clone();
        }
        if let Some(proxy) = &self.proxy {
            config.proxy_url = Some(proxy.clone());
        }
        config.validate().context("no usable API root, pass --root or --config")?;
        Ok(config)
    }

    pub fn request_options(&self) -> RequestOptions {
        let mut options = RequestOptions::new().use_cache(!self.no_cache);
        if self.page.is_some() || self.size.is_some() {
            let defaults = PageParams::default();
            options = options.page(PageParams::new(
                self.page.unwrap_or(defaults.page),
                self.size.unwrap_or(defaults.size),
            ));
        }
        for criterion in &self.sort {
            options = options.sort(criterion.path.clone(), criterion.order);
        }
        if let Some(projection) = &self.projection {
            options = options.projection(projection.clone());
        }
        options
    }
}

/// Runs the request described by `args` and returns the result as JSON.
///
/// With `--id` a single resource is fetched, otherwise a page.
pub async fn run(args: &Args) -> Result<Value> {
    let config = args.client_config()?;
    let service = ResourceService::connect(config, TypeRegistry::new().freeze())
        .context("failed to build client")?;
    let options = args.request_options();

    let json = match &args.id {
        Some(id) => {
            info!(resource = %args.resource, id = %id, "fetching resource");
            service
                .get_resource(&args.resource, id, &options)
                .await
                .with_context(|| format!("failed to fetch {}/{id}", args.resource))?
                .to_json()
        }
        None => {
            info!(resource = %args.resource, "fetching page");
            service
                .get_page(&args.resource, &options)
                .await
                .with_context(|| format!("failed to fetch {}", args.resource))?
                .to_json(&args.resource)
        }
    };
    Ok(json)
}
