use clap::Parser;

/// Draws pre-registered and waitlisted participants out of a roster.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the draw. The other flags
    /// override what it contains.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The roster, as an Excel, OpenDocument or CSV file. The first row must
    /// contain the column headers.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (excel or csv) The type of the input. By default, it is guessed from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using a spreadsheet, the name of the worksheet to read.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 60) The number of pre-registered participants to draw.
    #[clap(short, long, value_parser)]
    pub selected: Option<String>,

    /// (default 20) The number of participants to put on the waitlist.
    #[clap(short, long, value_parser)]
    pub alternates: Option<String>,

    /// (integer, optional) Makes the draw reproducible.
    #[clap(long, value_parser)]
    pub seed: Option<String>,

    /// (directory, default '.') Where the output files are written. The file names
    /// given with the --out-* flags are relative to this directory.
    #[clap(long, value_parser)]
    pub out_dir: Option<String>,

    /// (file name) Writes the results as an Excel workbook with one sheet per group.
    #[clap(long, value_parser)]
    pub out_xlsx: Option<String>,

    /// (file name) Writes the results as a PDF document with one section per group.
    #[clap(long, value_parser)]
    pub out_pdf: Option<String>,

    /// (file name) Writes the results in JSON format. This file can be exported again
    /// later with the --results flag.
    #[clap(long, value_parser)]
    pub out_json: Option<String>,

    /// (file path) Skips the draw and exports the results of a previous draw, as written
    /// with --out-json.
    #[clap(short, long, value_parser)]
    pub results: Option<String>,

    /// (file path) A reference file with the results of a draw in JSON format. If provided,
    /// sorteo checks that the results match the reference. This is useful with --seed.
    #[clap(long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
