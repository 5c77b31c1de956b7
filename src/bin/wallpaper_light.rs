use clap::Parser;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use anyhow::{Context, Result};
use wallpaper_light::{
    AnalyzerConfig, Algorithm, BitmapSource, Color, ColorAnalyzer, DemoLights, FileSource,
    HarmonyScheme, Region, apply_palette,
};

/// Wait after a failed cycle before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Drive lights from the colors of a wallpaper image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Wallpaper or screenshot to analyze; re-read on every cycle
    image: PathBuf,

    /// JSON analyzer configuration (missing keys use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of colors to extract
    #[arg(short = 'k', long)]
    num_colors: Option<usize>,

    /// Extraction algorithm: kmeans, quantile or histogram
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Harmony scheme; drawn at random each cycle when omitted
    #[arg(short, long)]
    scheme: Option<String>,

    /// Skip color harmony
    #[arg(long)]
    no_harmony: bool,

    /// Only analyze x1,y1,x2,y2 of the image
    #[arg(short, long)]
    region: Option<Region>,

    /// Repeat every N seconds instead of running once
    #[arg(short, long)]
    interval: Option<u64>,

    /// Number of demo lights to drive
    #[arg(short, long, default_value_t = 3)]
    devices: usize,

    /// Print the palette as a JSON array of hex strings
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    if let Some(k) = args.num_colors {
        config.num_colors = k;
    }
    if let Some(name) = &args.algorithm {
        config.algorithm = Algorithm::parse_lenient(name);
    }
    if args.no_harmony {
        config.color_harmony = false;
    }
    if let Some(name) = &args.scheme {
        config.harmony_scheme = Some(name.parse::<HarmonyScheme>()?);
    }

    let mut analyzer = ColorAnalyzer::new(config).context("invalid analyzer configuration")?;
    let mut source = FileSource::new(&args.image).with_region(args.region);
    let mut lights = DemoLights::new(args.devices);

    let Some(secs) = args.interval else {
        return run_once(&mut source, &mut analyzer, &mut lights, args.json);
    };

    log::info!("Updating lights every {secs} seconds");
    loop {
        match run_once(&mut source, &mut analyzer, &mut lights, args.json) {
            Ok(()) => thread::sleep(Duration::from_secs(secs)),
            Err(e) => {
                log::error!("Error in main loop: {e:#}");
                thread::sleep(RETRY_DELAY);
            }
        }
    }
}

fn run_once(
    source: &mut FileSource,
    analyzer: &mut ColorAnalyzer,
    lights: &mut DemoLights,
    json: bool,
) -> Result<()> {
    let image = source.capture().context("capture failed")?;
    let palette = analyzer.analyze(&image);
    let hex: Vec<String> = palette.iter().map(|c| Color::to_hex(*c)).collect();

    if json {
        println!("{}", serde_json::to_string(&hex)?);
    } else {
        println!("{}", hex.join(" "));
    }

    apply_palette(lights, &palette);
    log::info!("Updated lights with colors: {}", hex.join(", "));
    Ok(())
}
