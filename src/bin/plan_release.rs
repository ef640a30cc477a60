use std::env;
use std::path::PathBuf;
use tracing::{error, info};

use discotag::config::TaggerConfig;
use discotag::discogs::{DiscogsClient, JsonFileSource, ReleaseSource};
use discotag::import::ReleasePlan;

#[tokio::main]
async fn main() {
    // Use RUST_LOG env var if set, otherwise default to info level
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let mut source_dir: Option<PathBuf> = None;
    let mut dest_dir: Option<PathBuf> = None;
    let mut json_dir: Option<PathBuf> = None;
    let mut release_id: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let Some(value) = args.get(i + 1) else {
            error!("{} requires a value", flag);
            print_usage(&args[0]);
            std::process::exit(1);
        };

        match flag {
            "--source" => source_dir = Some(PathBuf::from(value)),
            "--dest" => dest_dir = Some(PathBuf::from(value)),
            "--json-dir" => json_dir = Some(PathBuf::from(value)),
            "--release-id" => match value.parse() {
                Ok(id) => release_id = Some(id),
                Err(_) => {
                    error!("Invalid release id: {}", value);
                    std::process::exit(1);
                }
            },
            _ => {
                error!("Unknown argument: {}", flag);
                print_usage(&args[0]);
                std::process::exit(1);
            }
        }
        i += 2;
    }

    let Some(source_dir) = source_dir else {
        error!("--source is required");
        print_usage(&args[0]);
        std::process::exit(1);
    };

    if !source_dir.is_dir() {
        error!("Source directory not found: {}", source_dir.display());
        std::process::exit(1);
    }

    let config = TaggerConfig::from_env();

    let source: Box<dyn ReleaseSource> = match (json_dir, config.discogs_api_key.clone()) {
        (Some(dir), _) => {
            info!("Reading saved releases from {}", dir.display());
            Box::new(JsonFileSource::new(dir))
        }
        (None, Some(api_key)) => Box::new(DiscogsClient::new(api_key)),
        (None, None) => {
            error!("Either --json-dir or DISCOTAG_DISCOGS_API_KEY is required");
            std::process::exit(1);
        }
    };

    let plan = match ReleasePlan::from_source(
        source.as_ref(),
        release_id,
        &source_dir,
        dest_dir.as_deref(),
        &config,
    )
    .await
    {
        Ok(plan) => plan,
        Err(e) if e.is_mapping_failure() => {
            error!("Cannot map release onto {}: {}", source_dir.display(), e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to plan release: {}", e);
            std::process::exit(1);
        }
    };

    print_plan(&plan);
}

fn print_plan(plan: &ReleasePlan) {
    let album = &plan.album;

    println!("Release:   {} ({})", album.release_id, album.url());
    println!("Album:     {} - {} ({})", album.artist, album.title, album.year);
    println!("Label:     {} [{}]", album.label, album.catalog_number);
    println!("Discs:     {}", album.disc_total);
    println!("Directory: {}", plan.dest_dir.display());
    for (disc, folder) in &plan.disc_folders {
        println!("  Disc {}:  {}", disc, folder);
    }
    println!();

    for entry in &plan.tag_map {
        println!(
            "{:02}. {} -> {}",
            entry.track.position,
            entry.original_path.display(),
            entry.relative_destination().display()
        );
    }
    println!();

    for (path, _) in plan.sidecar_files() {
        println!("Writes:    {}", path.display());
    }
    for path in &plan.other_files {
        println!("Copies:    {}", path.display());
    }
    for (name, value) in &plan.extra_tags {
        println!("Tag:       {}={}", name, value);
    }
    if plan.keeps_source() {
        println!("Source:    kept");
    } else {
        println!("Source:    removed after copy");
    }
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} --source <DIR> [--dest <DIR>] [--release-id <ID>] [--json-dir <DIR>]",
        program
    );
    eprintln!();
    eprintln!("Prints the naming plan for the audio files in <DIR> without touching them.");
    eprintln!();
    eprintln!("  --source      Folder holding the release's audio files");
    eprintln!("  --dest        Output root (default: parent of --source)");
    eprintln!("  --release-id  Discogs release id (default: read from the id file)");
    eprintln!("  --json-dir    Read <ID>.json release responses instead of the Discogs API");
}
