use clap::{Parser, Subcommand};
use soma_core::view::DEFAULT_TITLE;
use soma_core::{svg, AnalysisPayload, BodyMapView, InteractionState};
use soma_types::BodyZone;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soma")]
#[command(about = "SOMA body-map visualization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the canonical body zones
    Zones,
    /// Resolve an analysis JSON file into the normalized view model
    Resolve {
        /// Path to a saved analysis result
        file: PathBuf,
        /// Structure index to display (structural payloads)
        #[arg(long, default_value_t = 0)]
        structure: usize,
    },
    /// Render the body diagram as SVG
    Render {
        /// Path to a saved analysis result
        file: PathBuf,
        /// Structure index to display (structural payloads)
        #[arg(long, default_value_t = 0)]
        structure: usize,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the aggregated codes and quotes for one zone
    Inspect {
        /// Path to a saved analysis result
        file: PathBuf,
        /// Zone name, e.g. chest or solar_plexus
        zone: String,
        /// Structure index to display (structural payloads)
        #[arg(long, default_value_t = 0)]
        structure: usize,
    },
}

fn load_payload(file: &PathBuf) -> Result<AnalysisPayload, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(file)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    Ok(AnalysisPayload::from_value(&value))
}

fn state_for(payload: &AnalysisPayload, structure: usize) -> InteractionState {
    let mut state = InteractionState::new();
    state.select_structure(structure, payload.structure_count());
    state
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Zones) => {
            for zone in BodyZone::ALL {
                println!("{zone}");
            }
        }
        Some(Commands::Resolve { file, structure }) => {
            let payload = load_payload(&file)?;
            let view = BodyMapView::build(&payload, &state_for(&payload, structure));
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Some(Commands::Render {
            file,
            structure,
            out,
        }) => {
            let payload = load_payload(&file)?;
            let rendered = match payload.mode() {
                Some(mode) => {
                    let title = payload.structure_name(structure).unwrap_or(DEFAULT_TITLE);
                    svg::render(payload.zones(structure), mode, title)
                }
                None => svg::render_empty(),
            };
            match out {
                Some(path) => std::fs::write(&path, rendered)?,
                None => print!("{rendered}"),
            }
        }
        Some(Commands::Inspect {
            file,
            zone,
            structure,
        }) => {
            let zone = BodyZone::parse(&zone)?;
            let payload = load_payload(&file)?;
            let record = payload.zones(structure).zone(zone);

            println!("{}: {} codes", zone.label(), record.count);
            for group in soma_core::group_codes(&record.codes) {
                println!("  {} ({}x)", group.code, group.total_frequency);
                for member in &group.members {
                    println!("    {}: {}x", member.participant_id, member.frequency);
                }
            }
            if !record.quotes.is_empty() {
                println!("quotes:");
                for quote in &record.quotes {
                    println!("  \"{quote}\"");
                }
            }
        }
        None => {
            println!("Use 'soma --help' for commands");
        }
    }

    Ok(())
}
