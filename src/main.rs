use clap::Parser;
use pathwalk::{Error, Query, QueryOptions};
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Evaluates a JSONPath query against a JSON document.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The query, e.g. `$.store.book[*].author`
    query: String,

    /// JSON document to query; reads stdin when omitted
    file: Option<PathBuf>,

    /// Print every match as `path = value` instead of the bare result
    #[arg(long, default_value_t = false)]
    paths: bool,

    /// JSON file with query options (`maxResults`, `maxDescentDepth`)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Stop after this many matches
    #[arg(long)]
    max_results: Option<usize>,

    /// Maximum depth explored by recursive descent
    #[arg(long)]
    max_depth: Option<usize>,

    /// Pretty-print the JSON result
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn load_options(args: &Args) -> Result<QueryOptions, Error> {
    let mut options = match &args.options {
        Some(path) => QueryOptions::from_json(&fs::read_to_string(path)?)?,
        None => QueryOptions::default(),
    };
    if let Some(max_results) = args.max_results {
        options = options.with_max_results(max_results);
    }
    if let Some(depth) = args.max_depth {
        options = options.with_max_descent_depth(depth);
    }
    Ok(options)
}

fn read_document(args: &Args) -> Result<Value, Error> {
    let text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Error> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "pathwalk=warn");
        }
    }
    env_logger::init();

    let args = Args::parse();
    let options = load_options(&args)?;
    let data = read_document(&args)?;
    let query = Query::compile(&args.query)?.with_options(options);
    log::debug!("Evaluating '{}' with {:?}", query.source(), options);

    if args.paths {
        for pv in query.paths(&data)? {
            println!("{} = {}", pv.normalized_path_in(&data), pv.value);
        }
        return Ok(());
    }

    let result = query.get(&data)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", rendered);
    Ok(())
}
