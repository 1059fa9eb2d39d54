use clap::{ArgGroup, Parser};
use riverlabel::kurbo::Point;
use riverlabel::{FontSpec, MonospaceMetrics, PathInput, PlacementConfig, RejectReason};

#[derive(Parser)]
#[command(name = "riverlabel", about = "Place a label along a river path")]
#[command(group(ArgGroup::new("geometry").required(true).args(["coords", "polygon"])))]
struct Cli {
    /// Centerline as JSON, e.g. "[[0,0],[100,0,25],[200,10]]"
    #[arg(long)]
    coords: Option<String>,

    /// River outline as WKT, e.g. "POLYGON((0 0, 400 0, 400 30, 0 30))"
    #[arg(long)]
    polygon: Option<String>,

    /// Label text
    #[arg(short, long)]
    label: String,

    /// Font size in path units
    #[arg(long, default_value = "16")]
    font_size: f64,

    /// Glyph advance as a fraction of the font size (monospace metrics)
    #[arg(long, default_value = "0.6")]
    em_ratio: f64,

    /// Extra space between glyphs
    #[arg(long, default_value = "0")]
    letter_spacing: f64,

    /// Curvature (degrees per unit) above which a bend is rejected
    #[arg(long, default_value = "30")]
    curvature_threshold: f64,

    /// Ribbon width below which a section is rejected
    #[arg(long, default_value = "10")]
    min_width: f64,

    /// Print the full layout as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let input = match (&cli.coords, &cli.polygon) {
        (Some(json), _) => PathInput::Coordinates(serde_json::from_str(json)?),
        (None, Some(wkt)) => PathInput::Polygon(parse_wkt_polygon(wkt)?),
        (None, None) => unreachable!("clap requires one geometry argument"),
    };

    let config = PlacementConfig {
        curvature_threshold: cli.curvature_threshold,
        min_width: cli.min_width,
        font: FontSpec {
            size: cli.font_size,
            letter_spacing: cli.letter_spacing,
            ..FontSpec::default()
        },
        ..PlacementConfig::default()
    };
    let metrics = MonospaceMetrics {
        em_ratio: cli.em_ratio,
    };

    eprintln!();
    eprintln!("  riverlabel \u{00b7} \"{}\"", cli.label);
    eprintln!();

    let layout = riverlabel::place_label(&input, &cli.label, &metrics, &config)?;

    let count = |reason| layout.analysis.regions_with(reason).count();
    eprintln!(
        "  Path        {} points \u{00b7} length {:.1}{}",
        layout.path.len(),
        layout.path.total_length(),
        if layout.path.is_width_aware() { " \u{00b7} with widths" } else { "" },
    );
    eprintln!(
        "  Analyze     curvature avg {:.3} max {:.3} \u{00b7} {} sharp \u{00b7} {} narrow",
        layout.analysis.average_curvature,
        layout.analysis.max_curvature,
        count(RejectReason::SharpCurve),
        count(RejectReason::NarrowSection),
    );
    match &layout.placement.selected {
        Some(c) => eprintln!(
            "  Place       [{}..={}] score {:.1} (curv {:.0} \u{00b7} width {:.0} \u{00b7} pos {:.0} \u{00b7} straight {:.0}) of {} candidates",
            c.start,
            c.end,
            c.score,
            c.scores.curvature,
            c.scores.width,
            c.scores.position,
            c.scores.straightness,
            layout.placement.candidates.len(),
        ),
        None => eprintln!("  Place       no placement"),
    }
    if let Some(warning) = layout.warning() {
        eprintln!("  Warning     {}", warning);
    }
    eprintln!();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    }
    Ok(())
}

/// Parse the outer ring of a WKT `POLYGON((x y, x y, ...))`.
///
/// Holes and other geometry types are rejected.
fn parse_wkt_polygon(text: &str) -> Result<Vec<Point>, String> {
    let body = text
        .trim()
        .strip_prefix("POLYGON")
        .map(str::trim)
        .and_then(|s| s.strip_prefix("(("))
        .and_then(|s| s.strip_suffix("))"))
        .ok_or_else(|| format!("expected POLYGON((...)), got {:?}", text))?;
    if body.contains('(') || body.contains(')') {
        return Err("polygons with holes are not supported".to_string());
    }
    body.split(',')
        .enumerate()
        .map(|(i, pair)| {
            let values: Vec<f64> = pair
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| format!("vertex {}: {}", i, e))?;
            match values[..] {
                [x, y] => Ok(Point::new(x, y)),
                _ => Err(format!("vertex {}: expected \"x y\", got {:?}", i, pair.trim())),
            }
        })
        .collect()
}
