use clap::Parser;
use std::io::BufRead as _;
use std::path::PathBuf;

use lettering::normalizer::InlineNormalizer;
use lettering::render::save_png;
use lettering::{
    build_color_map, Configuration, ContextError, Dialect, ErrorKind, FontResource, Pipeline,
    RasterRenderer, Renderer as _,
};

#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct CliArguments {
    #[arg(
        short = 'm',
        long = "mode",
        help = "Dialect of the input document",
        value_enum,
        default_value = "inline"
    )]
    mode: Mode,
    #[arg(
        short = 'i',
        long = "input",
        value_name = "document_file",
        help = "Path to the input document, the lines are read from the standard input when it is missing"
    )]
    input_path: Option<PathBuf>,
    #[arg(
        short = 't',
        long = "text",
        value_name = "record",
        conflicts_with = "input_path",
        help = "A single inline record such as \"Title:Hello\""
    )]
    text: Option<String>,
    #[arg(short = 'f', long = "font", value_name = "font_file", help = "Path to the TTF/OTF font")]
    font_path: PathBuf,
    #[arg(short = 'o', long = "output", value_name = "png_file", help = "Path of the output PNG image")]
    output_path: Option<PathBuf>,
    #[arg(
        short = 'c',
        long = "configuration",
        value_name = "json_file",
        help = "Path to the JSON configuration of the style table and spacing"
    )]
    configuration_path: Option<PathBuf>,
    #[arg(short = 'w', long = "width", help = "Minimum width of the canvas in pixels")]
    canvas_width: Option<u32>,
    #[arg(long = "plan", help = "Print the layout plan as JSON")]
    print_plan: bool,
}

#[derive(Debug, Copy, Clone, clap::ValueEnum)]
enum Mode {
    Inline,
    Rtf,
    Html,
}

impl From<Mode> for Dialect {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Inline => Dialect::Inline,
            Mode::Rtf => Dialect::Rtf,
            Mode::Html => Dialect::Html,
        }
    }
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<(), ContextError> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let arguments = CliArguments::parse();
    log::debug!("{:?}", arguments);

    let configuration = match &arguments.configuration_path {
        Some(configuration_path) => Configuration::from_path(configuration_path)?,
        None => Configuration::default(),
    };
    let font = FontResource::from_path(&arguments.font_path)?;
    let pipeline = Pipeline::new(&configuration, &font);
    let dialect = Dialect::from(arguments.mode);

    let plan = match (&arguments.input_path, &arguments.text) {
        (Some(input_path), _) => pipeline.run_file(dialect, input_path, arguments.canvas_width)?,
        (None, Some(text)) => pipeline.run(dialect, text, arguments.canvas_width)?,
        (None, None) => {
            let typed_lines = read_standard_input()?;
            let segments = match dialect {
                Dialect::Inline => InlineNormalizer.normalize_lines(&typed_lines),
                _ => pipeline.normalize(dialect, &typed_lines.join("\n")),
            };
            pipeline.layout(&segments, arguments.canvas_width)?
        }
    };
    log::info!(
        "The document was laid out in {} lines on a {}x{} canvas",
        plan.lines.len(),
        plan.canvas_width,
        plan.canvas_height
    );

    if arguments.print_plan {
        let serialized_plan = serde_json::to_string_pretty(&plan).map_err(|error| {
            ContextError::with_error(ErrorKind::Render, "Failed to serialize the layout plan", &error)
        })?;
        println!("{}", serialized_plan);
    }

    if let Some(output_path) = &arguments.output_path {
        let colors = build_color_map(&font);
        let canvas = RasterRenderer::new(font.clone()).render(&plan, &colors)?;
        save_png(&canvas, output_path)?;
    } else if !arguments.print_plan {
        log::warn!("Neither an output image nor the plan were requested, nothing to do");
    }

    Ok(())
}

/// Reads the lines typed on the standard input until its end.
fn read_standard_input() -> Result<Vec<String>, ContextError> {
    log::info!("Reading the document from the standard input, end it with Ctrl-D");
    std::io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| {
            ContextError::with_error(
                ErrorKind::ResourceUnavailable,
                "Failed to read the standard input",
                &error,
            )
        })
}
