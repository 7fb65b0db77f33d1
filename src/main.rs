use anyhow::Result;
use clap::Parser;
use spin_tracker_rs::{pipeline, ArtifactStore};

#[derive(Parser, Debug)]
#[command(name = "spin_tracker")]
#[command(about = "Batch-process recorded ball sessions into kinematic and spin metrics", long_about = None)]
struct Args {
    /// Directory containing recorded session artifacts
    #[arg(long, default_value = "spin_sessions")]
    data_dir: String,

    /// Also reprocess sessions that already have a calculated artifact
    #[arg(long)]
    reprocess: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = ArtifactStore::new(&args.data_dir)?;
    let sessions = store.list_sessions()?;
    println!(
        "Found {} recorded session(s) in {}",
        sessions.len(),
        args.data_dir
    );

    let mut processed = 0usize;
    let mut failed = 0usize;

    for info in &sessions {
        if info.has_calculated && !args.reprocess {
            println!("  {} - already processed, skipping", info.name);
            continue;
        }

        match pipeline::process_raw(&store, &info.name) {
            Ok(summary) => {
                processed += 1;
                println!("  {} - {} samples", info.name, summary.sample_count);
                if summary.sample_count == 0 {
                    println!("    no data");
                    continue;
                }
                println!("    Max speed:      {:.4} m/s", summary.max_speed);
                println!("    Avg speed:      {:.4} m/s", summary.avg_speed);
                println!("    Total distance: {:.4} m", summary.total_distance);
                println!("    Max spin rate:  {:.2} RPM", summary.max_spin_rate);
                println!("    Avg spin rate:  {:.2} RPM", summary.avg_spin_rate);
                if let Some(dir) = summary.dominant_spin {
                    println!("    Dominant spin:  {dir}");
                }
            }
            Err(e) => {
                failed += 1;
                log::error!("failed to process session {}: {e}", info.name);
            }
        }
    }

    println!("\nProcessed {processed} session(s), {failed} failure(s)");
    Ok(())
}
