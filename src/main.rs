use anyhow::{Context, Result};
use clap::Parser;
use nestpack_rs::config::CliArgs;
use nestpack_rs::driver;
use nestpack_rs::error::Error;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nestpack_rs=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliArgs::parse().into_config();

    let report = match driver::run(&config) {
        Ok(report) => report,
        Err(e @ Error::Pack(_)) => {
            tracing::error!("{}", e);
            eprintln!("Packing failed. Please adjust container size or margin.");
            return Err(e.into());
        }
        Err(e) => return Err(e).context("packing run aborted"),
    };

    // Placed list, one rectangle per line, in input order
    println!(
        "# container {}x{} margin {} fitness {:.4} coverage {:.1}%",
        config.container.width,
        config.container.height,
        config.margin,
        report.best_fitness,
        report.layout.coverage() * 100.0
    );
    println!("# index\tlabel\tx\ty\twidth\theight\trotated");
    for r in &report.layout.rects {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.index,
            if r.label.is_empty() { "-" } else { r.label.as_str() },
            r.x,
            r.y,
            r.w,
            r.h,
            r.rotated
        );
    }

    Ok(())
}
