use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use sectormap::layout::LayoutCache;
use sectormap::model::ItemSet;
use sectormap::render::{Frame, Presentation};
use sectormap::source;

const DEFAULT_EXPANDED: (u32, u32) = (1200, 800);
const DEFAULT_MINI: (u32, u32) = (160, 100);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sectormap=info".parse()?))
        .init();

    // sectormap [items.json|-] [EXPANDED_WxH] [MINI_WxH]
    let mut args = std::env::args().skip(1);
    let items = match args.next() {
        Some(path) if path != "-" => source::load_items(Path::new(&path))
            .with_context(|| format!("loading items from {}", path))?,
        _ => {
            tracing::info!("No item file given, using built-in sample");
            source::sample_items()
        }
    };
    let expanded_size = size_arg(args.next(), DEFAULT_EXPANDED)?;
    let mini_size = size_arg(args.next(), DEFAULT_MINI)?;

    let set = ItemSet::from_items(items);
    let cache = LayoutCache::default();

    // The overview is usually on screen before the detail view has ever been
    // sized, so seed the cache at the canonical size first.
    cache.prime(&set);

    let mini = Presentation::mini().frame(&set, &cache, mini_size.0, mini_size.1);
    let expanded = Presentation::expanded().frame(&set, &cache, expanded_size.0, expanded_size.1);

    print_frame("expanded", &expanded);
    print_frame("mini", &mini);

    Ok(())
}

fn size_arg(arg: Option<String>, default: (u32, u32)) -> Result<(u32, u32)> {
    match arg {
        Some(text) => source::parse_size(&text)
            .with_context(|| format!("invalid size '{}', expected WIDTHxHEIGHT", text)),
        None => Ok(default),
    }
}

fn print_frame(label: &str, frame: &Frame<'_>) {
    println!(
        "== {} {}x{} ({:?}, {} sectors)",
        label,
        frame.width,
        frame.height,
        frame.source,
        frame.sectors.len()
    );
    for sector in &frame.sectors {
        let change = sector
            .change
            .map(|c| format!("{:+.2}%", c))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<20} {:>5},{:<5} {:>5}x{:<5} {}",
            sector.name, sector.rect.x, sector.rect.y, sector.rect.w, sector.rect.h, change
        );
        for cell in &sector.cells {
            println!(
                "    {:<8} {:>5},{:<5} {:>5}x{:<5} w={:<8} {:+.2}%",
                cell.item.ticker,
                cell.rect.x,
                cell.rect.y,
                cell.rect.w,
                cell.rect.h,
                cell.item.weight,
                cell.item.change
            );
        }
    }
}
