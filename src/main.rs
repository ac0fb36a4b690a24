use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use mangagrid::async_api::RenderJob;
use mangagrid::cache::{search_key, PageCache};
use mangagrid::search::{clamp_page, SearchQuery};
use mangagrid::{choose_layout, GalleryConfig, GalleryItem, ProfileHeader, RenderWorker};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mangagrid", version, about = "Render gallery pages of manga search results")]
struct Cli {
    /// JSON config file; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a page described by a JSON manifest
    Render {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Only use covers given as local files
        #[arg(long)]
        no_fetch: bool,
        /// Write a JPEG of at most this many KiB instead of a PNG
        #[arg(long)]
        jpeg_kb: Option<usize>,
        /// Give up on rendering after this many milliseconds
        #[arg(long, default_value_t = 60_000)]
        deadline_ms: u64,
    },
    /// Print the grid chosen for a number of items
    Layout {
        #[arg(long)]
        items: usize,
    },
    /// Delete the cached pages of one owner
    ClearCache {
        #[arg(long)]
        owner: String,
    },
    /// Print the site query string and cache key for chat search input
    Query { input: String },
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default = "first_page")]
    max_page: u32,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    items: Vec<ManifestItem>,
    #[serde(default)]
    header: Option<ProfileHeader>,
    #[serde(default)]
    avatar_path: Option<PathBuf>,
}

#[derive(Deserialize)]
struct ManifestItem {
    #[serde(flatten)]
    item: GalleryItem,
    #[serde(default)]
    cover_path: Option<PathBuf>,
}

fn first_page() -> u32 {
    1
}

fn load_config(path: Option<&Path>) -> Result<GalleryConfig> {
    match path {
        Some(p) => GalleryConfig::from_file(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(GalleryConfig::default()),
    }
}

fn read_optional(path: &Path, what: &str) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Could not read {} {}: {}", what, path.display(), e);
            None
        }
    }
}

#[cfg(feature = "fetch")]
async fn fetch_covers(config: &GalleryConfig, items: &mut [GalleryItem]) -> Result<()> {
    let fetcher = mangagrid::fetch::CoverFetcher::new(&config.fetch).context("creating cover fetcher")?;
    let filled = fetcher.fill_covers(items).await;
    info!("Fetched {} cover(s)", filled);
    Ok(())
}

#[cfg(not(feature = "fetch"))]
async fn fetch_covers(_config: &GalleryConfig, _items: &mut [GalleryItem]) -> Result<()> {
    warn!("Built without the fetch feature; remote covers are skipped");
    Ok(())
}

async fn render(
    config: GalleryConfig,
    manifest_path: &Path,
    out: &Path,
    no_fetch: bool,
    jpeg_kb: Option<usize>,
    deadline_ms: u64,
) -> Result<()> {
    let raw = std::fs::read_to_string(manifest_path)
        .with_context(|| format!("reading manifest {}", manifest_path.display()))?;
    let manifest: Manifest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing manifest {}", manifest_path.display()))?;

    if manifest.items.is_empty() {
        println!("no results");
        return Ok(());
    }

    let page = clamp_page(manifest.page, manifest.max_page);
    let cache = PageCache::new(config.cache_dir.clone());
    if let (Some(owner), None) = (manifest.owner.as_deref(), jpeg_kb) {
        if let Some(cached) = cache.lookup(owner, page) {
            std::fs::copy(&cached, out).with_context(|| format!("copying {}", cached.display()))?;
            info!("Served page {} for {} from cache", page, owner);
            return Ok(());
        }
    }

    let mut items: Vec<GalleryItem> = manifest
        .items
        .into_iter()
        .map(|m| {
            let mut item = m.item;
            if let Some(path) = m.cover_path {
                item.set_cover(read_optional(&path, "cover"));
            }
            item
        })
        .collect();
    if !no_fetch {
        fetch_covers(&config, &mut items).await?;
    }

    let mut header = manifest.header;
    if let (Some(h), Some(path)) = (header.as_mut(), manifest.avatar_path.as_deref()) {
        h.avatar = read_optional(path, "avatar");
    }

    let worker = RenderWorker::new(Some(config)).await.context("starting render worker")?;
    let job = RenderJob {
        items,
        page,
        max_page: manifest.max_page,
        header,
    };
    let rendered = worker
        .render_with_deadline(job, deadline_ms)
        .await
        .context("rendering page")?;
    worker.close().await.context("stopping render worker")?;

    match jpeg_kb {
        Some(kb) => {
            let bytes = rendered.encode_jpeg_within(kb, 95)?;
            std::fs::write(out, &bytes).with_context(|| format!("writing {}", out.display()))?;
            info!("Wrote {} ({} bytes)", out.display(), bytes.len());
        }
        None => {
            rendered
                .save(out)
                .with_context(|| format!("writing {}", out.display()))?;
            info!("Wrote {}", out.display());
        }
    }

    if let Some(owner) = manifest.owner.as_deref() {
        let path = cache.store(owner, page, &rendered)?;
        info!("Cached page as {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            manifest,
            out,
            no_fetch,
            jpeg_kb,
            deadline_ms,
        } => render(config, &manifest, &out, no_fetch, jpeg_kb, deadline_ms).await?,
        Command::Layout { items } => {
            let plan = choose_layout(items, &config.budget.grid_constraints())?;
            println!(
                "columns={} rows={} scale={:.4}",
                plan.columns, plan.rows, plan.scale
            );
        }
        Command::ClearCache { owner } => {
            let removed = PageCache::new(config.cache_dir.clone()).clear(&owner)?;
            println!("removed {} cached page(s)", removed);
        }
        Command::Query { input } => {
            let query = SearchQuery::parse(&input).to_string();
            println!("{}", query);
            println!("cache key: {}", search_key(&query));
        }
    }
    Ok(())
}
