use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// cdl-dump — inspect crash-diagnostic dump files
///
/// Locates the dump file an instrumented run wrote, validates it
/// against the dump schema, and summarizes what it captured.
#[derive(Parser)]
#[command(name = "cdl-dump", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a dump: parse it fully and report ok or the first error
    Check {
        /// Directory to search for the dump file
        search_root: PathBuf,
    },

    /// Print a short summary of what the dump captured
    Summary {
        /// Directory to search for the dump file
        search_root: Option<PathBuf>,
        /// Parse this file directly instead of searching
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check { search_root } => match cdl_dump::from_search_root(&search_root) {
            Ok(dump) => {
                println!(
                    "ok: version {}, {} device(s)",
                    dump.version,
                    dump.devices.len()
                );
                0
            }
            Err(err) => {
                eprintln!("error: {err}");
                1
            }
        },
        Commands::Summary { search_root, file } => {
            let loaded = match (file, search_root) {
                (Some(path), _) => cdl_dump::from_file(&path),
                (None, Some(root)) => cdl_dump::from_search_root(&root),
                (None, None) => {
                    eprintln!("error: give a search root or --file");
                    process::exit(2);
                }
            };
            match loaded {
                Ok(dump) => {
                    print_summary(&dump);
                    0
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    1
                }
            }
        }
    };

    process::exit(exit_code);
}

fn print_summary(dump: &cdl_dump::DumpFile) {
    println!("dump version {} started {}", dump.version, dump.start_time);
    println!(
        "instance {} application {:?}",
        dump.instance.handle, dump.instance.application
    );
    for device in &dump.devices {
        let command_buffers = if device.all_command_buffers.is_empty() {
            (&device.incomplete_command_buffers, "incomplete")
        } else {
            (&device.all_command_buffers, "all")
        };
        println!(
            "device {} {:?}: {} queue(s), {} command buffer(s) ({})",
            device.handle,
            device.device_name,
            device.queues.len(),
            command_buffers.0.len(),
            command_buffers.1,
        );
        for queue in &device.queues {
            println!(
                "  queue {} family {} index {}: {} incomplete submit(s)",
                queue.handle,
                queue.queue_family_index,
                queue.index,
                queue.incomplete_submits.len()
            );
        }
    }
}
