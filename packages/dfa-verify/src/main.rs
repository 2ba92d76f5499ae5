use anyhow::Context;
use clap::Parser;
use dfa_verify_lib::{
    config::DfaVerifyConfig,
    logger::{LogLevel, Logger},
    render::GraphvizRenderer,
    session::{Evaluation, Session},
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "DFA Verification Tool")]
#[command(version = "0.1")]
#[command(about = "Check strings against a deterministic finite automaton and draw it", long_about = None)]
struct Args {
    /// JSON definition of the automaton.
    file: String,

    /// String to verify.
    #[arg(short, long, conflicts_with = "input_file")]
    input: Option<String>,

    /// Text file holding the string to verify.
    #[arg(short = 'f', long)]
    input_file: Option<String>,

    /// Render the automaton to an image.
    #[arg(short, long)]
    show: bool,

    /// Where to write the rendered image, overrides the config.
    #[arg(short, long)]
    output: Option<String>,

    /// Print the DOT representation of the automaton.
    #[arg(long)]
    dot: bool,

    /// Print the automaton as JSON, completed if a verification completed it.
    #[arg(long)]
    dump: bool,

    #[arg(short, long)]
    config: Option<String>,

    /// Enable logging at this level (debug, info, warn or error), overrides the config.
    #[arg(short, long)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Serialize)]
struct VerificationReport<'a> {
    input: &'a str,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    sink: Option<&'a str>,
}

impl<'a> VerificationReport<'a> {
    fn new(evaluation: &'a Evaluation, sink: Option<&'a str>) -> Self {
        VerificationReport {
            input: &evaluation.input,
            accepted: evaluation.accepted,
            sink,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = DfaVerifyConfig::from_optional_file(args.config.as_ref())?;
    if let Some(level) = args.log_level {
        let logger = config
            .get_logger()
            .clone()
            .with_enabled(true)
            .with_log_level(level);
        config.set_logger(logger);
    }

    let level = if *config.get_logger().get_enabled() {
        config.get_logger().get_log_level().to_tracing()
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let logger = Logger::from_config(config.get_logger(), "dfa-verify".into())
        .context("failed to set up logger")?;

    let mut session = Session::new(
        config.get_evaluation().clone(),
        GraphvizRenderer::from_config(config.get_render()),
        logger.as_ref(),
    );

    session
        .load_file(&args.file)
        .with_context(|| format!("failed to load automaton from {}", args.file))?;

    let input = match (&args.input, &args.input_file) {
        (Some(input), _) => Some(input.clone()),
        (None, Some(path)) => Some(
            session
                .load_input(path)
                .with_context(|| format!("failed to load input from {}", path))?,
        ),
        (None, None) => None,
    };

    if let Some(input) = input {
        let evaluation = session.evaluate(&input)?;
        let report = VerificationReport::new(&evaluation, session.sink());
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if args.dump
        && let Some(dfa) = session.automaton()
    {
        println!("{}", dfa.to_json()?);
    }

    if args.dot {
        print!("{}", session.graph()?.to_graphviz());
    }

    if args.show {
        let output = args
            .output
            .unwrap_or_else(|| config.get_render().get_output().clone());

        let image = session.render().context("failed to show automaton")?;
        image
            .write_to(&output)
            .with_context(|| format!("failed to write image to {}", output))?;

        match image.dimensions {
            Some((width, height)) => eprintln!("Wrote {output} ({width}x{height})"),
            None => eprintln!("Wrote {output}"),
        }
    }

    Ok(())
}
