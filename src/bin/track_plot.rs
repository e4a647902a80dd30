use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a recorded frame log: satellite track and body-fixed orientation"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/track.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Debug, Clone)]
struct Row {
    elapsed_s: f64,
    orientation: f64,
    sat: [f64; 3],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let rows = read_rows(&cli.input)?;
    if rows.is_empty() {
        return Err(anyhow::anyhow!("Frame log contains no rows"));
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 22.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);
    let (track_area, history_area) = root.split_horizontally((cli.width / 2) as i32);

    // Top-down view: scene +Y is the inertial vertical, so plot X against Z.
    let extent = rows
        .iter()
        .flat_map(|r| [r.sat[0].abs(), r.sat[2].abs()])
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;
    {
        let mut chart = ChartBuilder::on(&track_area)
            .margin(20)
            .caption("Satellite track (top view)", caption_font.clone())
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-extent..extent, -extent..extent)?;
        chart
            .configure_mesh()
            .x_desc("X (scene)")
            .y_desc("Z (scene)")
            .label_style(label_font.clone())
            .draw()?;

        chart.draw_series(std::iter::once(Circle::new(
            (0.0, 0.0),
            6,
            RGBColor(40, 90, 200).filled(),
        )))?;
        chart.draw_series(LineSeries::new(
            rows.iter().map(|r| (r.sat[0], r.sat[2])),
            &RED,
        ))?;
        if let Some(last) = rows.last() {
            chart.draw_series(std::iter::once(Circle::new(
                (last.sat[0], last.sat[2]),
                4,
                RED.filled(),
            )))?;
        }
    }

    let t_min = rows.first().map(|r| r.elapsed_s).unwrap_or(0.0);
    let t_max = rows.last().map(|r| r.elapsed_s).unwrap_or(0.0).max(t_min + 1.0);
    let (o_min, o_max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, r| {
        (acc.0.min(r.orientation), acc.1.max(r.orientation))
    });
    let o_pad = ((o_max - o_min) * 0.05).max(0.01);
    {
        let mut chart = ChartBuilder::on(&history_area)
            .margin(20)
            .caption("Body-fixed orientation", caption_font)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(
                (t_min / 3_600.0)..(t_max / 3_600.0),
                (o_min - o_pad)..(o_max + o_pad),
            )?;
        chart
            .configure_mesh()
            .x_desc("Elapsed (h)")
            .y_desc("Orientation (rad)")
            .label_style(label_font)
            .y_label_formatter(&|v| format!("{v:.2}"))
            .draw()?;
        chart.draw_series(LineSeries::new(
            rows.iter().map(|r| (r.elapsed_s / 3_600.0, r.orientation)),
            &BLACK,
        ))?;
    }

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_rows(path: &str) -> anyhow::Result<Vec<Row>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("Frame log missing '{}' column", name))
    };
    let elapsed_idx = column("elapsed_s")?;
    let orientation_idx = column("orientation_rad")?;
    let sat_idx = [column("sat_x")?, column("sat_y")?, column("sat_z")?];

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let field = |idx: usize| -> f64 { r.get(idx).unwrap_or("").parse().unwrap_or(f64::NAN) };
        let row = Row {
            elapsed_s: field(elapsed_idx),
            orientation: field(orientation_idx),
            sat: [field(sat_idx[0]), field(sat_idx[1]), field(sat_idx[2])],
        };
        if row.elapsed_s.is_finite()
            && row.orientation.is_finite()
            && row.sat.iter().all(|v| v.is_finite())
        {
            rows.push(row);
        }
    }
    Ok(rows)
}
