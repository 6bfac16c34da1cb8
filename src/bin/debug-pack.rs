/// Diagnostic tool to verify config → search → packing → tree pipeline
use clap::Parser;
use nestpack_rs::config::CliArgs;
use nestpack_rs::driver;
use nestpack_rs::search::encoding::encode_rects;
use nestpack_rs::tree::partition;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nestpack_rs=debug".parse()?),
        )
        .init();

    let config = CliArgs::parse().into_config();

    println!("=== DIAGNOSTIC: Config → Search → Packing Pipeline ===");
    println!(
        "Container: {}x{}  margin: {}  rotation: {}",
        config.container.width, config.container.height, config.margin, config.allow_rotation
    );

    // Config
    config.validate()?;
    let genes = encode_rects(&config.rects)?;
    println!("\n[1] {} rectangles, encoded genes:", config.rects.len());
    for (i, (rect, gene)) in config.rects.iter().zip(&genes).enumerate() {
        println!(
            "    [{}] '{}' {}x{} -> 0x{:08X} ({}x{})",
            i,
            rect.label,
            rect.width,
            rect.height,
            gene.0,
            gene.width(),
            gene.height()
        );
    }

    // Search + pack
    let start = std::time::Instant::now();
    let report = driver::run(&config)?;
    println!(
        "\n[2] Search: {} generations, {} evaluations, best fitness {:.4} ({:.1} ms)",
        report.generations,
        report.evaluations,
        report.best_fitness,
        start.elapsed().as_secs_f64() * 1000.0
    );

    let layout = &report.layout;
    println!("\n[3] Layout: {} rectangles", layout.rects.len());
    for (rect, size) in layout.rects.iter().zip(&report.sizes) {
        println!(
            "    [{}] '{}' searched {}x{} -> placed {}x{} at ({}, {}){} node={:?}",
            rect.index,
            rect.label,
            size.width,
            size.height,
            rect.w,
            rect.h,
            rect.x,
            rect.y,
            if rect.rotated { " rotated" } else { "" },
            rect.node
        );
    }

    // Tree
    let tree = &layout.tree;
    let free = partition::free_area(tree);
    let occupied = partition::occupied_area(tree);
    println!(
        "\n[4] Free-space tree: {} nodes, {} free leaves",
        tree.len(),
        tree.free_leaves().count()
    );
    println!("    Occupied footprint area: {:.0}", occupied);
    println!("    Free leaf area:          {:.0}", free);
    println!("    Container area:          {:.0}", layout.container().area());

    // Anomalies
    println!("\n[5] Checking for anomalies:");
    let violations = partition::check(tree);
    let overlaps = layout.overlapping_pairs();
    let outside = layout.out_of_bounds();
    println!("    Partition violations: {}", violations.len());
    for v in violations.iter().take(10) {
        println!("      {:?}", v);
    }
    println!("    Overlapping pairs:    {:?}", overlaps);
    println!("    Out of bounds:        {:?}", outside);
    println!("    Coverage: {:.1}%", layout.coverage() * 100.0);

    // Largest free leaves left for anything else
    let mut leaves: Vec<_> = tree
        .free_leaves()
        .map(|id| tree.get(id).region)
        .filter(|r| r.area() > 0.0)
        .collect();
    leaves.sort_by(|a, b| b.area().total_cmp(&a.area()));
    println!("\n[6] Top 5 free regions:");
    for (i, r) in leaves.iter().take(5).enumerate() {
        println!("    [{}] {}x{} at ({}, {})", i, r.w, r.h, r.x, r.y);
    }

    Ok(())
}
