use clap::{Parser, Subcommand};

mod cmd;
mod money;
mod tax;

/// Compare net income across Dutch employment and company structures
#[derive(Parser, Debug)]
#[command(name = "incomec", version, about)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute all scenarios and print the results table
    Compare(cmd::compare::CompareCommand),
    /// Write an HTML report with table and chart, and open it
    Html(cmd::html_report::HtmlCommand),
    /// Show the built-in scenarios and their rates
    Scenarios(cmd::scenarios::ScenariosCommand),
    /// Print the input file schema or the CSV output columns
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.command {
        Command::Compare(compare) => compare.exec(),
        Command::Html(html) => html.exec(),
        Command::Scenarios(scenarios) => scenarios.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
