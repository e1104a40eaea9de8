use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use complex_base::{
    Gradient, PointSeries, RadixMode, SeriesExport, Session, SessionConfig, SymbolSource,
    init_tracing,
};

#[derive(Parser)]
#[command(name = "complex-base")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explore how integers land in the complex plane when written in a complex base")]
struct Cli {
    /// JSON file with the starting symbols, radix and view controls
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive navigator (default)
    Repl,
    /// Compute one series and print or export it
    Series(SeriesArgs),
}

#[derive(Args)]
struct SeriesArgs {
    /// Comma separated digit symbols, e.g. "0, 1, j"
    #[arg(long, conflicts_with = "roots", allow_hyphen_values = true)]
    symbols: Option<String>,

    /// Use 0 plus n roots of unity as digit symbols
    #[arg(long)]
    roots: Option<usize>,

    /// Radix as a complex literal, e.g. "-1+j"
    #[arg(long, conflicts_with = "abs", allow_hyphen_values = true)]
    radix: Option<String>,

    /// Radix absolute value (with --angle)
    #[arg(long, requires = "angle", allow_hyphen_values = true)]
    abs: Option<f64>,

    /// Radix angle in degrees, 0..=360 (with --abs)
    #[arg(long, requires = "abs")]
    angle: Option<i32>,

    /// Number of integers to plot, starting at 0
    #[arg(short, long)]
    points: Option<usize>,

    /// Half-extent of the square viewport
    #[arg(long)]
    field: Option<u32>,

    /// Connect consecutive points
    #[arg(long)]
    lines: bool,

    /// Write the series here (.bin for binary, anything else for JSON)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// How many entries to print when not exporting
    #[arg(long, default_value_t = 8)]
    show: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let mut session = match &cli.config {
        Some(path) => {
            let config = SessionConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            Session::from_config(&config).with_context(|| format!("applying {}", path.display()))?
        }
        None => Session::new(),
    };

    match cli.command {
        Some(Command::Series(args)) => run_series(&mut session, args),
        Some(Command::Repl) | None => run_repl(&mut session),
    }
}

fn run_series(session: &mut Session, args: SeriesArgs) -> Result<()> {
    if let Some(text) = &args.symbols {
        session.set_symbols_text(text).context("--symbols")?;
    }
    if let Some(n) = args.roots {
        session.set_roots_of_unity(n).context("--roots")?;
    }
    if let Some(text) = &args.radix {
        session.set_radix_text(text).context("--radix")?;
    }
    if let (Some(abs), Some(angle)) = (args.abs, args.angle) {
        session.set_radix_polar(abs, angle).context("--abs/--angle")?;
    }
    if let Some(points) = args.points {
        session.set_points(points).context("--points")?;
    }
    if let Some(field) = args.field {
        session.set_field_size(field).context("--field")?;
    }
    if args.lines {
        session.set_draw_lines(true);
    }

    let series = session.series()?;
    let gradient = Gradient::digits();
    match &args.output {
        Some(path) => {
            let format = SeriesExport::new(&series, session, &gradient)
                .write_to(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {} points to {} ({:?})", series.len(), path.display(), format);
        }
        None => print_series(session, &series, &gradient, args.show),
    }
    Ok(())
}

fn run_repl(session: &mut Session) -> Result<()> {
    println!("\n╭──────────────────────────────────────────╮");
    println!("│   complex base numeral systems navigator │");
    println!("│                                          │");
    println!("│ integers written in a complex radix,     │");
    println!("│ coloured by how many digits they need    │");
    println!("│                                          │");
    println!("│ /help for commands, /quit to leave       │");
    println!("╰──────────────────────────────────────────╯\n");

    let gradient = Gradient::digits();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("radix> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let rest = rest.trim();
        debug!(command, rest, "repl command");

        match command {
            "/quit" | "/exit" => break,
            "/help" => print_help(),
            "/state" => print_state(session),
            _ => {
                if let Err(e) = apply(session, &gradient, command, rest) {
                    // the session still holds the last valid configuration
                    println!("error: {e:#}\n");
                }
            }
        }
    }
    Ok(())
}

fn apply(session: &mut Session, gradient: &Gradient, command: &str, rest: &str) -> Result<()> {
    match command {
        "/symbols" => {
            session.set_symbols_text(rest)?;
            println!("symbols: {}\n", format_symbols(session));
        }
        "/roots" => {
            let n = rest.parse::<usize>().context("usage: /roots <n>")?;
            session.set_roots_of_unity(n)?;
            println!("symbols: {}\n", format_symbols(session));
        }
        "/radix" => {
            session.set_radix_text(rest)?;
            println!("radix: {}\n", session.radix());
        }
        "/polar" => {
            let mut parts = rest.split_whitespace();
            let (Some(abs), Some(angle), None) = (parts.next(), parts.next(), parts.next()) else {
                bail!("usage: /polar <abs> <degrees>");
            };
            let abs = abs.parse::<f64>().context("radix absolute value")?;
            let angle = angle.parse::<i32>().context("radix angle (whole degrees)")?;
            session.set_radix_polar(abs, angle)?;
            println!("radix: {}\n", session.radix());
        }
        "/mode" => {
            let mode = match rest {
                "manual" => RadixMode::Manual,
                "polar" => RadixMode::Polar,
                _ => bail!("usage: /mode manual|polar"),
            };
            session.set_radix_mode(mode);
            println!("radix: {}\n", session.radix());
        }
        "/points" => {
            let n = rest.parse::<usize>().context("usage: /points <n>")?;
            session.set_points(n)?;
            println!("points: {}\n", session.points());
        }
        "/field" => {
            let n = rest.parse::<u32>().context("usage: /field <n>")?;
            session.set_field_size(n)?;
            println!("field: ±{}\n", session.field_size());
        }
        "/lines" => {
            let on = match rest {
                "on" => true,
                "off" => false,
                _ => bail!("usage: /lines on|off"),
            };
            session.set_draw_lines(on);
            println!("lines: {}\n", if on { "on" } else { "off" });
        }
        "/series" => {
            let show = if rest.is_empty() {
                8
            } else {
                rest.parse::<usize>().context("usage: /series [k]")?
            };
            let series = session.series()?;
            print_series(session, &series, gradient, show);
        }
        "/export" => {
            if rest.is_empty() {
                bail!("usage: /export <path>");
            }
            let series = session.series()?;
            let format = SeriesExport::new(&series, session, gradient).write_to(rest)?;
            println!("✓ wrote {} points to {} ({:?})\n", series.len(), rest, format);
        }
        _ => bail!("unknown command '{command}' (try /help)"),
    }
    Ok(())
}

fn print_help() {
    println!("  /state                  show the current controls");
    println!("  /symbols <a, b, ...>    digit symbols as complex literals");
    println!("  /roots <n>              0 plus n roots of unity as symbols");
    println!("  /radix <complex>        radix as a complex literal, e.g. -1+j");
    println!("  /polar <abs> <degrees>  radix from absolute value and angle");
    println!("  /mode manual|polar      switch radix input mode");
    println!("  /points <n>             number of integers plotted (16..=32768)");
    println!("  /field <n>              viewport half-extent (50..=500)");
    println!("  /lines on|off           connect consecutive points");
    println!("  /series [k]             compute and summarise, showing k entries");
    println!("  /export <path>          write the series (.bin or JSON)");
    println!("  /quit\n");
}

fn format_symbols(session: &Session) -> String {
    session
        .symbols()
        .iter()
        .map(|s| format!("{:.3}", s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_state(session: &Session) {
    let source = match session.symbol_source() {
        SymbolSource::Manual { text, .. } => format!("manual \"{}\"", text),
        SymbolSource::RootsOfUnity { n, .. } => format!("roots of unity, n = {}", n),
    };
    let polar = session.polar();

    println!("\n╭─── Navigator State ───╮");
    println!("│ Symbols: {} ({})", session.symbols().len(), source);
    println!("│   {}", format_symbols(session));
    match session.radix_mode() {
        RadixMode::Manual => {
            println!("│ Radix: {} (manual \"{}\")", session.radix(), session.radix_text())
        }
        RadixMode::Polar => println!(
            "│ Radix: {:.4} (|r| = {}, {}°)",
            session.radix(),
            polar.abs,
            polar.angle_degrees
        ),
    }
    println!("│ Points: {}", session.points());
    println!("│ Field: ±{}", session.field_size());
    println!("│ Lines: {}", if session.draw_lines() { "on" } else { "off" });
    println!("╰───────────────────────╯\n");
}

fn print_series(session: &Session, series: &PointSeries, gradient: &Gradient, show: usize) {
    let field = session.field_size() as f64;
    let inside = series
        .iter()
        .filter(|e| e.point.re.abs() <= field && e.point.im.abs() <= field)
        .count();

    println!(
        "\n{} points, base {}, longest representation {} digits",
        series.len(),
        session.symbols().len(),
        series.max_length()
    );
    if let Some(b) = series.bounds() {
        println!(
            "bounds: re [{:.3}, {:.3}]  im [{:.3}, {:.3}]",
            b.min.re, b.max.re, b.min.im, b.max.im
        );
    }
    println!("inside ±{}: {}/{}", session.field_size(), inside, series.len());

    for entry in series.iter().take(show) {
        println!(
            "{:>6}  {:>16}  {:>10.4} {:>+10.4}i  w={:.3}  #{:06x}",
            entry.index,
            entry.digits.to_string(),
            entry.point.re,
            entry.point.im,
            entry.weight,
            gradient.sample(entry.weight).to_u32()
        );
    }
    if series.len() > show {
        println!("   ... {} more", series.len() - show);
    }
    println!();
}
