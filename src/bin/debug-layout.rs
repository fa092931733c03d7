/// Diagnostic tool to verify items → layout → snapped frame pipeline
use anyhow::Context;
use sectormap::layout::{compose, sort_descending, LayoutCache, LayoutConfig, Rect};
use sectormap::model::ItemSet;
use sectormap::render::Presentation;
use sectormap::source;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sectormap=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let items_path = args.next().map(PathBuf::from);
    let (width, height) = match args.next() {
        Some(text) => source::parse_size(&text)
            .with_context(|| format!("invalid size '{}', expected WIDTHxHEIGHT", text))?,
        None => (1200, 800),
    };

    println!("=== DIAGNOSTIC: Items → Layout → Frame Pipeline ===");

    let items = match &items_path {
        Some(path) => source::load_items(path)
            .with_context(|| format!("loading items from {}", path.display()))?,
        None => source::sample_items(),
    };
    println!("\n[1] Items loaded: {}", items.len());

    let set = ItemSet::from_items(items);
    let grouped = set.sectors();
    let sectors = sort_descending(&grouped);
    println!("\n[2] Sectors: {}", sectors.len());
    for (i, sector) in sectors.iter().enumerate() {
        println!(
            "    [{}] '{}' - weight {:.2} ({} items)",
            i,
            sector.name,
            sector.weight,
            sector.items.len()
        );
    }

    let config = LayoutConfig::default();
    let layout = compose(&set, width as f64, height as f64, &config);
    println!(
        "\n[3] Layout computed at {}x{}: {} sectors, {} items",
        width,
        height,
        layout.sectors.len(),
        layout.item_count()
    );

    println!("\n[4] Top 10 largest item rectangles by area:");
    let mut placed: Vec<_> = layout.items_absolute().collect();
    placed.sort_by(|a, b| b.rect.area().total_cmp(&a.rect.area()));
    for (i, p) in placed.iter().take(10).enumerate() {
        println!(
            "    [{}] '{}' - rect: {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1}) - aspect {:.2}",
            i,
            p.data.ticker,
            p.rect.w,
            p.rect.h,
            p.rect.area(),
            p.rect.x,
            p.rect.y,
            p.rect.aspect_ratio()
        );
    }

    println!("\n[5] Checking for anomalies:");
    let canvas_area = width as f64 * height as f64;
    let area_sum: f64 = placed.iter().map(|p| p.rect.area()).sum();
    println!("    Total rect area: {:.0}px²", area_sum);
    println!("    Canvas area:     {:.0}px²", canvas_area);
    if canvas_area > 0.0 {
        println!("    Coverage: {:.4}%", (area_sum / canvas_area) * 100.0);
    }

    let rects: Vec<Rect> = placed.iter().map(|p| p.rect).collect();
    let mut overlaps = 0usize;
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            if a.intersection_area(b) > 1e-6 {
                overlaps += 1;
            }
        }
    }
    println!("    Overlapping pairs: {}", overlaps);

    let worst = placed
        .iter()
        .map(|p| p.rect.aspect_ratio())
        .filter(|r| r.is_finite())
        .fold(1.0, f64::max);
    println!("    Worst aspect ratio: {:.2}", worst);

    println!("\n[6] Snapped frames:");
    let cache = LayoutCache::new(config);
    let expanded = Presentation::expanded().frame(&set, &cache, width, height);
    let mini_w = (width / 8).max(1);
    let mini_h = (height / 8).max(1);
    let mini = Presentation::mini().frame(&set, &cache, mini_w, mini_h);

    for frame in [&expanded, &mini] {
        let pixel_area: i64 = frame.sectors.iter().map(|s| s.rect.area()).sum();
        let escaped = frame
            .sectors
            .iter()
            .flat_map(|s| s.cells.iter().map(move |c| (s.inner, c)))
            .filter(|(inner, c)| !inner.contains(&c.rect))
            .count();
        println!(
            "    {}x{} ({:?}): {} cells, sector pixels {} / {}, cells outside their sector: {}",
            frame.width,
            frame.height,
            frame.source,
            frame.cells().count(),
            pixel_area,
            frame.width as i64 * frame.height as i64,
            escaped
        );
    }

    Ok(())
}
