use clap::Parser;

/// Renders the notice and election-result fragments of the site, and keeps them fresh.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON configuration of the board: data root, data files, refresh interval.
    /// Required unless --convert-notices is used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, or file path with --convert-notices) Where to write the output. For rendering,
    /// this overrides the outputDirectory of the configuration. For conversion, 'stdout' or
    /// empty prints the JSON document.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// If passed as an argument, renders once and exits instead of refreshing on a timer.
    #[clap(long, takes_value = false)]
    pub once: bool,

    /// (directory) A directory of reference fragments. If provided, electboard renders once and
    /// checks that every fragment matches the reference with the same file name.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path) Converts a notice ledger (date|title|content[|pdf] per line) to the JSON
    /// notice document, then exits.
    #[clap(long, value_parser)]
    pub convert_notices: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
