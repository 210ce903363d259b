use deparc::render::raster::{RasterError, RasterOptions, svg_to_png};
use deparc::render::{
    FocusTarget, HtmlRenderOptions, LayoutOptions, SvgRenderOptions, Theme, layout_sentence,
    render_html, render_svg, sanitize_svg_id, stats_text_table,
};
use deparc::{
    AdapterRegistry, AnalysisOutcome, AnalysisSession, Backend, DependencyStats, PayloadBackend,
    Sentence, TokenId, ValidationOptions,
};
use futures::executor::block_on;
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Deparc(deparc::Error),
    Render(deparc::render::HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
    Stale,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Deparc(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Stale => write!(f, "analysis request was superseded"),
        }
    }
}

impl CliError {
    fn is_malformed_input(&self) -> bool {
        match self {
            CliError::Deparc(err) => err.is_structural(),
            CliError::Render(err) => err.is_malformed_input(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<deparc::Error> for CliError {
    fn from(value: deparc::Error) -> Self {
        Self::Deparc(value)
    }
}

impl From<deparc::render::HeadlessError> for CliError {
    fn from(value: deparc::render::HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Stats,
    Layout,
    Render,
    Normalize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Svg,
    Html,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    backend: Backend,
    lenient: bool,
    json: bool,
    pretty: bool,
    verbose: bool,
    theme: Option<String>,
    config: Option<String>,
    render_format: RenderFormat,
    focus: Option<FocusTarget>,
    caption: bool,
    title: Option<String>,
    diagram_id: Option<String>,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "deparc-cli\n\
\n\
USAGE:\n\
  deparc-cli [stats] [--backend B] [--lenient] [--json] [--pretty] [<path>|-]\n\
  deparc-cli layout [--backend B] [--lenient] [--theme web|desktop] [--config <json-file>] [--pretty] [<path>|-]\n\
  deparc-cli render [--format svg|html|png] [--backend B] [--lenient] [--theme web|desktop] [--config <json-file>] [--focus-token <id>] [--focus-edge <head>:<dep>] [--caption] [--title <text>] [--id <diagram-id>] [--scale <n>] [--background <css-color>] [--out <path>] [<path>|-]\n\
  deparc-cli normalize [--backend B] [--pretty] [<path>|-]\n\
\n\
BACKENDS:\n\
  canonical (default), hanlp, spacy, stanza, conllu\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is the parser's output for one sentence; it is normalized to canonical tokens first.\n\
  - Malformed token lists are rejected (exit code 3) unless --lenient is given.\n\
  - render prints SVG/HTML to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - -v/--verbose enables debug logging on stderr; DEPARC_LOG overrides the filter.\n\
"
}

fn parse_focus_edge(raw: &str) -> Option<FocusTarget> {
    let (head, dep) = raw.split_once(':')?;
    let head: TokenId = head.trim().parse().ok()?;
    let dep: TokenId = dep.trim().parse().ok()?;
    Some(FocusTarget::edge(head, dep))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "stats" => args.command = Command::Stats,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "normalize" => args.command = Command::Normalize,
            "--lenient" => args.lenient = true,
            "--json" => args.json = true,
            "--pretty" => args.pretty = true,
            "--caption" => args.caption = true,
            "-v" | "--verbose" => args.verbose = true,
            "--backend" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.backend = name
                    .parse::<Backend>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--theme" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if Theme::preset(name).is_none() {
                    return Err(CliError::Usage(usage()));
                }
                args.theme = Some(name.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--focus-token" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let id: TokenId = id.parse().map_err(|_| CliError::Usage(usage()))?;
                args.focus = Some(FocusTarget::token(id));
            }
            "--focus-edge" => {
                let Some(edge) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.focus = Some(parse_focus_edge(edge).ok_or(CliError::Usage(usage()))?);
            }
            "--title" => {
                let Some(title) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.title = Some(title.clone());
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(sanitize_svg_id(id));
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("DEPARC_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn build_theme(args: &Args) -> Result<Theme, CliError> {
    let theme = match args.theme.as_deref() {
        Some(name) => Theme::preset(name).ok_or(CliError::Usage(usage()))?,
        None => Theme::default(),
    };
    let Some(path) = args.config.as_deref() else {
        return Ok(theme);
    };
    let overrides: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    theme
        .with_overrides(&overrides)
        .map_err(|e| CliError::Render(e.into()))
}

/// Runs the input through an analysis session. The file already holds the parser's response, so
/// the backend's fetcher passes the payload through unchanged and only the adapter does work.
fn analyze(text: &str, args: &Args) -> Result<Sentence, CliError> {
    let registry = AdapterRegistry::with_builtin_adapters();
    let Some(adapter) = registry.get(args.backend) else {
        return Err(deparc::Error::adapter(args.backend, "no adapter registered").into());
    };
    let backend = PayloadBackend::new(adapter, |payload: String| {
        futures::future::ready(Ok::<_, deparc::Error>(payload))
    });
    let validation = if args.lenient {
        ValidationOptions::lenient()
    } else {
        ValidationOptions::strict()
    };
    let session = AnalysisSession::new(validation);
    match block_on(session.analyze(&backend, text)) {
        AnalysisOutcome::Ready(sentence) => {
            for diagnostic in sentence.diagnostics() {
                tracing::warn!(?diagnostic, "input accepted with diagnostics");
            }
            Ok(sentence)
        }
        AnalysisOutcome::Failed(err) => Err(err.into()),
        AnalysisOutcome::Stale { .. } => Err(CliError::Stale),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Normalize => {
            let registry = AdapterRegistry::with_builtin_adapters();
            let tokens = registry.normalize(args.backend, &text)?;
            write_json(&tokens, args.pretty)
        }
        Command::Stats => {
            let sentence = analyze(&text, &args)?;
            let stats = DependencyStats::compute(&sentence);
            if args.json {
                write_json(&stats, args.pretty)
            } else {
                write_text(&stats_text_table(&stats), None)
            }
        }
        Command::Layout => {
            let sentence = analyze(&text, &args)?;
            let layout_opts = LayoutOptions::default().with_theme(build_theme(&args)?);
            let layout =
                layout_sentence(&sentence, &layout_opts).map_err(|e| CliError::Render(e.into()))?;
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let sentence = analyze(&text, &args)?;
            let layout_opts = LayoutOptions::default().with_theme(build_theme(&args)?);
            let layout =
                layout_sentence(&sentence, &layout_opts).map_err(|e| CliError::Render(e.into()))?;
            let svg_options = SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                focus: args.focus,
                include_stats_caption: args.caption,
                ..Default::default()
            };

            match args.render_format {
                RenderFormat::Svg => {
                    let svg = render_svg(&layout, &layout_opts.theme, &svg_options);
                    write_text(&svg, args.out.as_deref())?;
                }
                RenderFormat::Html => {
                    let stats = DependencyStats::compute(&sentence);
                    let html_options = HtmlRenderOptions {
                        title: args.title.clone(),
                        svg: svg_options,
                        include_script: true,
                    };
                    let html = render_html(&layout, &stats, &layout_opts.theme, &html_options);
                    write_text(&html, args.out.as_deref())?;
                }
                RenderFormat::Png => {
                    let svg = render_svg(&layout, &layout_opts.theme, &svg_options);
                    let raster = RasterOptions {
                        scale: args.render_scale,
                        background: args.background.clone(),
                    };
                    let bytes = svg_to_png(&svg, &raster)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(&out, bytes)?;
                        tracing::debug!(path = %out, "PNG written");
                    }
                }
            }
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(err) if err.is_malformed_input() => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
