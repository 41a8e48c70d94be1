use clap::{Parser, Subcommand};
use h2kit::{load_kit_spec, KitPipeline, KITS_DIR, MEDIA_DIR};
use std::path::PathBuf;

/// Hydrogen drumkit generator
#[derive(Parser)]
#[command(name = "h2kit")]
#[command(about = "Generate trigger MIDI and packaged Hydrogen drumkits from a kit spec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the trigger MIDI file to render through a synth/VST
    Midi {
        /// Kit specification file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output MIDI path (default: media/<kit_code>.mid or the
        /// spec's midi_out)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Package the rendered samples into a .h2drumkit archive
    Kit {
        /// Kit specification file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory holding the rendered samples
        #[arg(long, default_value = MEDIA_DIR)]
        media: PathBuf,

        /// Output directory for the archive
        #[arg(long, default_value = KITS_DIR)]
        kits: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Midi { config, out } => {
            let spec = load_kit_spec(&config)?;
            log::info!("creating '{}' MIDI file -- using {}", spec.kit_code, config.display());
            let pipeline = KitPipeline::new(spec);
            let path = pipeline.write_midi(out.as_deref())?;
            println!("{}", path.display());
        }
        Commands::Kit { config, media, kits } => {
            let spec = load_kit_spec(&config)?;
            log::info!(
                "creating '{}' h2drumkit file -- using {}",
                spec.kit_code,
                config.display()
            );
            let pipeline = KitPipeline::new(spec);
            let path = pipeline.package(&media, &kits)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
