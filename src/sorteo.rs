use log::{debug, info, warn};

use participant_draw::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

use crate::args::Args;
use crate::sorteo::config_reader::*;
use crate::sorteo::io_results::DrawSummary;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
pub mod io_results;
mod write_pdf;
mod write_xlsx;

/// The names of the two groups, as displayed in the outputs.
pub const SELECTED_TITLE: &str = "Preinscritos";
pub const ALTERNATES_TITLE: &str = "Reservas";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SorteoError {
    #[snafu(display("Error reading the file {path}: {source}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The file {path} has no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("The file {path} is empty: a header row is required"))]
    EmptyExcel { path: String },
    #[snafu(display("Error reading the file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}: {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Unknown input type {provider:?} for {path} (expected excel or csv)"))]
    UnknownProvider { provider: String, path: String },
    #[snafu(display("Error opening the file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the results: {source}"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Invalid seed {value:?} (expected a non-negative integer)"))]
    InvalidSeed { value: String },
    #[snafu(display("{source}"))]
    InvalidCount { source: DrawErrors },
    #[snafu(display("{source}"))]
    Draw { source: DrawErrors },
    #[snafu(display("Internal error while exporting the results: {source}"))]
    Schema { source: DrawErrors },
    #[snafu(display("Error writing {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error building the workbook: {source}"))]
    Zip { source: zip::result::ZipError },
    #[snafu(display("The results differ from the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SorteoResult<T> = Result<T, SorteoError>;

/// The settings of one run, once the command line and the configuration file are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
struct Settings {
    input: Option<InputSource>,
    rules: DrawRules,
    output_dir: PathBuf,
    xlsx_file: Option<PathBuf>,
    pdf_file: Option<PathBuf>,
    json_file: Option<PathBuf>,
}

fn resolve_settings(args: &Args, config: Option<(DrawConfig, PathBuf)>) -> SorteoResult<Settings> {
    let (config, root) = match config {
        Some((c, root)) => (c, root),
        None => (DrawConfig::default(), PathBuf::from(".")),
    };
    let rules_config = config.rules.clone().unwrap_or_default();
    let output_config = config.output_settings.clone().unwrap_or_default();

    let input = match (&args.input, config.input_source) {
        (Some(p), _) => Some(InputSource {
            file_path: p.clone(),
            provider: args.input_type.clone(),
            worksheet_name: args.excel_worksheet_name.clone(),
        }),
        (None, Some(src)) => Some(InputSource {
            file_path: io_common::resolve_path(&root, &src.file_path)
                .display()
                .to_string(),
            provider: args.input_type.clone().or(src.provider),
            worksheet_name: args.excel_worksheet_name.clone().or(src.worksheet_name),
        }),
        (None, None) => None,
    };

    let want_selected = match &args.selected {
        Some(s) => parse_count("--selected", s).context(InvalidCountSnafu {})?,
        None => rules_config
            .pre_registered()?
            .unwrap_or(DrawRules::DEFAULT_RULES.want_selected),
    };
    let want_alternates = match &args.alternates {
        Some(s) => parse_count("--alternates", s).context(InvalidCountSnafu {})?,
        None => rules_config
            .reserves()?
            .unwrap_or(DrawRules::DEFAULT_RULES.want_alternates),
    };
    let seed = match &args.seed {
        Some(s) => Some(parse_seed(s)?),
        None => rules_config.random_seed()?,
    };

    let output_dir: PathBuf = match (&args.out_dir, &output_config.output_directory) {
        (Some(d), _) => PathBuf::from(d),
        (None, Some(d)) => io_common::resolve_path(&root, d),
        (None, None) => PathBuf::from("."),
    };
    let in_output_dir = |cli: &Option<String>, conf: &Option<String>| -> Option<PathBuf> {
        cli.clone().or_else(|| conf.clone()).map(|f| output_dir.join(f))
    };

    Ok(Settings {
        input,
        rules: DrawRules {
            want_selected,
            want_alternates,
            seed,
        },
        xlsx_file: in_output_dir(&args.out_xlsx, &output_config.xlsx_file),
        pdf_file: in_output_dir(&args.out_pdf, &output_config.pdf_file),
        json_file: in_output_dir(&args.out_json, &output_config.json_file),
        output_dir,
    })
}

/// Reads the rows of a roster, using the reader that corresponds to the source.
pub fn read_table(source: &InputSource) -> SorteoResult<Vec<RawRow>> {
    let path = source.file_path.as_str();
    let provider = match &source.provider {
        Some(p) => p.clone(),
        None => io_common::infer_provider(path).to_string(),
    };
    info!("Attempting to read roster {:?} as {}", path, provider);
    let rows = match provider.as_str() {
        "excel" | "xlsx" | "ods" => io_excel::read_excel_roster(path, source),
        "csv" => io_csv::read_csv_roster(path),
        _ => UnknownProviderSnafu {
            provider: provider.as_str(),
            path,
        }
        .fail(),
    }?;
    info!(
        "Read {} rows from {}",
        rows.len(),
        io_common::simplify_file_name(path)
    );
    Ok(rows)
}

fn run_new_draw(source: &InputSource, rules: &DrawRules) -> SorteoResult<DrawSummary> {
    let raw_rows = read_table(source)?;
    let pool = normalize(&raw_rows);
    debug!("pool: {:?}", pool);
    let result = run_draw(&pool, rules).context(DrawSnafu {})?;
    Ok(DrawSummary::from_draw(&result, rules.seed))
}

fn write_output(path: &Path, bytes: &[u8]) -> SorteoResult<()> {
    let p = path.display().to_string();
    fs::write(path, bytes).context(WritingOutputSnafu { path: p.clone() })?;
    info!("Wrote {}", p);
    Ok(())
}

fn print_summary(sections: &[(String, Vec<ExportRow>)]) {
    for (title, rows) in sections.iter() {
        println!("{} ({})", title, rows.len());
        println!("{}", io_common::format_line(&schema::EXPORT_HEADERS));
        for row in rows.iter() {
            let values: Vec<&str> = row.iter().map(|(_, v)| v.as_str()).collect();
            println!("{}", io_common::format_line(&values));
        }
        println!();
    }
}

fn check_reference(summary: &DrawSummary, reference_path: &str) -> SorteoResult<()> {
    let reference = io_results::read_results(reference_path)?;
    let pretty_ref = io_results::to_json_string(&reference)?;
    let pretty_stats = io_results::to_json_string(summary)?;
    if pretty_ref != pretty_stats {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_ref.as_str(), pretty_stats.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The results match the reference {}", reference_path);
    Ok(())
}

/// Runs a draw (or the export of a previous one) as described by the arguments.
pub fn run(args: &Args) -> SorteoResult<()> {
    let config = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            Some((config, root))
        }
        None => None,
    };
    let settings = resolve_settings(args, config)?;
    debug!("settings: {:?}", settings);

    let summary: DrawSummary = match (&args.results, &settings.input) {
        (Some(results_path), _) => {
            let ignored: Vec<&str> = [
                ("--input", args.input.is_some()),
                ("--selected", args.selected.is_some()),
                ("--alternates", args.alternates.is_some()),
                ("--seed", args.seed.is_some()),
            ]
            .iter()
            .filter(|(_, given)| *given)
            .map(|(flag, _)| *flag)
            .collect();
            if !ignored.is_empty() {
                whatever!(
                    "--results exports a previous draw and cannot be combined with {}",
                    ignored.join(", ")
                );
            }
            info!("Exporting the results of {:?}, no draw is run", results_path);
            io_results::read_results(results_path)?
        }
        (None, Some(source)) => run_new_draw(source, &settings.rules)?,
        (None, None) => {
            whatever!("No roster provided: use --input, --config or --results")
        }
    };

    let selected = denormalize_records(&summary.selected).context(SchemaSnafu {})?;
    let alternates = denormalize_records(&summary.alternates).context(SchemaSnafu {})?;
    let sections: Vec<(String, Vec<ExportRow>)> = vec![
        (SELECTED_TITLE.to_string(), selected),
        (ALTERNATES_TITLE.to_string(), alternates),
    ];

    print_summary(&sections);

    let has_outputs =
        settings.xlsx_file.is_some() || settings.pdf_file.is_some() || settings.json_file.is_some();
    if has_outputs {
        fs::create_dir_all(&settings.output_dir).context(WritingOutputSnafu {
            path: settings.output_dir.display().to_string(),
        })?;
    }
    if let Some(p) = &settings.xlsx_file {
        write_output(p, &write_xlsx::write_sheets(&sections)?)?;
    }
    if let Some(p) = &settings.pdf_file {
        write_output(p, &write_pdf::write_report(&sections)?)?;
    }
    if let Some(p) = &settings.json_file {
        write_output(p, io_results::to_json_string(&summary)?.as_bytes())?;
    }

    if let Some(reference_path) = &args.reference {
        check_reference(&summary, reference_path)?;
    }

    Ok(())
}

fn parse_seed(value: &str) -> SorteoResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .context(InvalidSeedSnafu { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn args(flags: &[&str]) -> Args {
        let mut all = vec!["sorteo"];
        all.extend_from_slice(flags);
        Args::parse_from(all)
    }

    fn write_roster(dir: &Path, n: usize) -> PathBuf {
        let p = dir.join("inscriptos.csv");
        let mut f = fs::File::create(&p).unwrap();
        writeln!(f, "Numero,Apellido,Nombres,DNI,Celular,Correo Electrónico ,Observaciones").unwrap();
        for i in 1..=n {
            writeln!(f, "{},Apellido{},Nombre{},{},,p{}@mail.org,x", i, i, i, 30000000 + i, i)
                .unwrap();
        }
        p
    }

    #[test]
    fn defaults_without_config() {
        let s = resolve_settings(&args(&["-i", "roster.xlsx"]), None).unwrap();
        assert_eq!(s.rules, DrawRules::DEFAULT_RULES);
        assert_eq!(s.output_dir, PathBuf::from("."));
        assert_eq!(s.xlsx_file, None);
        assert_eq!(s.input.unwrap().file_path, "roster.xlsx");
    }

    #[test]
    fn invalid_counts_are_reported() {
        let res = resolve_settings(&args(&["-i", "r.csv", "--selected", "sesenta"]), None);
        assert!(matches!(res, Err(SorteoError::InvalidCount { .. })));
        let res = resolve_settings(&args(&["-i", "r.csv", "--seed=-4"]), None);
        assert!(matches!(res, Err(SorteoError::InvalidSeed { .. })));
    }

    #[test]
    fn flags_override_config() {
        let config = parse_config(
            r#"{
                "inputSource": {"filePath": "data/roster.csv"},
                "rules": {"preRegistered": 3, "reserves": "2", "randomSeed": "42"},
                "outputSettings": {"outputDirectory": "out", "pdfFile": "r.pdf"}
            }"#,
            "config.json",
        )
        .unwrap();
        let s = resolve_settings(
            &args(&["--alternates", "1", "--out-xlsx", "r.xlsx"]),
            Some((config, PathBuf::from("/srv/draws"))),
        )
        .unwrap();
        assert_eq!(
            s.rules,
            DrawRules {
                want_selected: 3,
                want_alternates: 1,
                seed: Some(42)
            }
        );
        assert_eq!(
            s.input.unwrap().file_path,
            PathBuf::from("/srv/draws/data/roster.csv").display().to_string()
        );
        assert_eq!(s.output_dir, PathBuf::from("/srv/draws/out"));
        assert_eq!(s.pdf_file, Some(PathBuf::from("/srv/draws/out/r.pdf")));
        assert_eq!(s.xlsx_file, Some(PathBuf::from("/srv/draws/out/r.xlsx")));
    }

    #[test]
    fn draw_from_csv_roster() {
        let dir = tempfile::tempdir().unwrap();
        let roster = write_roster(dir.path(), 5);
        let out = dir.path().join("out");
        let a = args(&[
            "-i",
            roster.to_str().unwrap(),
            "--selected",
            "3",
            "--alternates",
            "2",
            "--seed",
            "42",
            "--out-dir",
            out.to_str().unwrap(),
            "--out-json",
            "r.json",
            "--out-xlsx",
            "r.xlsx",
            "--out-pdf",
            "r.pdf",
        ]);
        run(&a).unwrap();
        let summary = io_results::read_results(out.join("r.json").to_str().unwrap()).unwrap();
        assert_eq!(summary.selected.len(), 3);
        assert_eq!(summary.alternates.len(), 2);
        assert_eq!(summary.seed, Some(42));
        assert!(out.join("r.xlsx").exists());
        assert!(out.join("r.pdf").exists());

        // Same seed: the results match the reference
        let again = args(&[
            "-i",
            roster.to_str().unwrap(),
            "-s",
            "3",
            "-a",
            "2",
            "--seed",
            "42",
            "--reference",
            out.join("r.json").to_str().unwrap(),
        ]);
        run(&again).unwrap();
    }

    #[test]
    fn not_enough_participants() {
        let dir = tempfile::tempdir().unwrap();
        let roster = write_roster(dir.path(), 5);
        let a = args(&["-i", roster.to_str().unwrap(), "-s", "4", "-a", "2"]);
        let res = run(&a);
        assert!(matches!(
            res,
            Err(SorteoError::Draw {
                source: DrawErrors::InsufficientParticipants {
                    available: 5,
                    requested: 6
                }
            })
        ));
    }

    #[test]
    fn export_previous_results() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("previous.json");
        fs::write(
            &results,
            r#"{"preRegistered": 1, "reserves": 0,
                "selected": [{"number": "7", "last_name": "Ríos", "first_name": "Eva",
                              "document_id": "1", "phone": "", "email": ""}],
                "alternates": []}"#,
        )
        .unwrap();
        let a = args(&[
            "--results",
            results.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--out-xlsx",
            "export.xlsx",
        ]);
        run(&a).unwrap();
        assert!(dir.path().join("export.xlsx").exists());
    }

    #[test]
    fn results_with_draw_flags_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("previous.json");
        fs::write(
            &results,
            r#"{"preRegistered": 0, "reserves": 0, "selected": [], "alternates": []}"#,
        )
        .unwrap();
        let res = run(&args(&["--results", results.to_str().unwrap(), "--seed", "7"]));
        match res {
            Err(SorteoError::Whatever { message, .. }) => assert!(message.contains("--seed")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_roster() {
        assert!(matches!(
            run(&args(&[])),
            Err(SorteoError::Whatever { .. })
        ));
    }
}
