use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use fnm_inp::Deck;
use fnm_io::{
    FnmModel, PresetParameters, RunReport, UelSettings, preprocess, save_report, write_output_bundle,
};
use fnm_mesh::TopologyBuilder;
use fnm_model::{DeckSections, ModelSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod prompt;

use prompt::PromptParameters;

const REPORT_FILE: &str = "fnm_report.json";

fn usage() {
    eprintln!("usage: fnm-cli prepare <job.inp> [--params FILE] [--out-dir DIR] [--report] [-v]");
    eprintln!("       fnm-cli inspect <job.inp> [-v]");
}

#[derive(Debug, Default)]
struct PrepareArgs {
    input: PathBuf,
    params: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    report: bool,
}

enum Command {
    Prepare(PrepareArgs),
    Inspect(PathBuf),
}

fn parse_args(args: &[String]) -> Option<(Command, bool)> {
    let (command, rest) = args.split_first()?;
    let mut verbose = false;
    let mut positional = Vec::new();
    let mut prepare = PrepareArgs::default();

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "--report" => prepare.report = true,
            "--params" => prepare.params = Some(PathBuf::from(iter.next()?)),
            "--out-dir" => prepare.out_dir = Some(PathBuf::from(iter.next()?)),
            flag if flag.starts_with('-') => return None,
            value => positional.push(value),
        }
    }
    let [input] = positional.as_slice() else {
        return None;
    };

    match command.as_str() {
        "prepare" => {
            prepare.input = PathBuf::from(*input);
            Some((Command::Prepare(prepare), verbose))
        }
        "inspect" if prepare.params.is_none() && prepare.out_dir.is_none() && !prepare.report => {
            Some((Command::Inspect(PathBuf::from(*input)), verbose))
        }
        _ => None,
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn print_summary(summary: &ModelSummary) {
    println!("total_cards: {}", summary.total_cards);
    println!("total_data_lines: {}", summary.total_data_lines);
    println!("parts: {}", summary.part_names.join(", "));
    println!("fnm_parts: {}", summary.fnm_part_names.join(", "));
    println!("assemblies: {}", summary.assemblies);
    println!("material_defs: {}", summary.material_defs);
    println!("node_rows: {}", summary.node_rows);
    println!("element_rows: {}", summary.element_rows);
    println!("node_sets: {}", summary.node_sets);
    println!("element_sets: {}", summary.element_sets);
    println!("steps: {}", summary.steps);
}

fn inspect(path: &Path) -> Result<(), String> {
    let deck = Deck::parse_file(path).map_err(|err| format!("parse error: {err}"))?;
    print_summary(&ModelSummary::from_deck(&deck));

    let sections = DeckSections::extract(&deck).map_err(|err| format!("model error: {err}"))?;
    let part = &sections.fnm_part;
    let topology = TopologyBuilder::build(&part.nodes, &part.elements)
        .map_err(|err| format!("mesh error: {err}"))?;
    println!("fnm_part: {}", part.name);
    println!("ply_real_nodes: {}", topology.real_node_count());
    println!("ply_nodes: {}", topology.nodes_per_ply());
    println!("ply_edges: {}", topology.edges_per_ply());
    println!("ply_elements: {}", topology.elements().len());
    if let Some((min, max)) = topology.edge_length_range() {
        println!("edge_length_range: {min} .. {max}");
    }
    let node_sets: Vec<&str> = part.node_sets.iter().map(|set| set.name.as_str()).collect();
    println!("fnm_node_sets: {}", node_sets.join(", "));
    if let Some(predelam) = &part.predelam {
        println!("predelam_elements: {}", predelam.elements.len());
    }
    Ok(())
}

fn job_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "job".to_string())
}

fn run_pipeline(deck: &Deck, args: &PrepareArgs) -> Result<(FnmModel, UelSettings), String> {
    let result = match &args.params {
        Some(path) => {
            let mut preset = PresetParameters::load(path)
                .map_err(|err| format!("cannot read parameters {}: {err}", path.display()))?;
            let settings = preset.uel.clone();
            preprocess(deck, &mut preset).map(|model| (model, settings))
        }
        None => {
            let stdin = io::stdin();
            let mut source = PromptParameters::new(stdin.lock(), io::stdout());
            preprocess(deck, &mut source).map(|model| (model, UelSettings::default()))
        }
    };
    result.map_err(|err| err.to_string())
}

fn prepare(args: &PrepareArgs) -> Result<(), String> {
    let deck = Deck::parse_file(&args.input).map_err(|err| format!("parse error: {err}"))?;
    let (model, settings) = run_pipeline(&deck, args)?;

    let job = job_name(&args.input);
    let out_dir = args.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let bundle = write_output_bundle(&out_dir, &job, &model, &settings)
        .map_err(|err| format!("cannot write outputs to {}: {err}", out_dir.display()))?;

    if args.report {
        let report = RunReport::new(&job, Utc::now().to_rfc3339(), &model, &bundle);
        let path = out_dir.join(REPORT_FILE);
        save_report(&path, &report)
            .map_err(|err| format!("cannot write report {}: {err}", path.display()))?;
        info!("run report written to {}", path.display());
    }

    println!("job: {job}");
    println!("ply_blocks: {}", model.layup.block_count());
    println!("laminate_nodes: {}", model.laminate.node_count());
    println!("laminate_edges: {}", model.laminate.edge_count());
    println!("nodes_per_element: {}", model.laminate.nodes_per_element());
    println!("deck: {}", bundle.deck_path.display());
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, verbose)) = parse_args(&args) else {
        usage();
        return ExitCode::from(2);
    };
    init_logging(verbose);

    let outcome = match &command {
        Command::Prepare(args) => prepare(args),
        Command::Inspect(path) => inspect(path),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}
