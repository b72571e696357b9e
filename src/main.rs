//! debt-netting CLI
//!
//! Run debt graph simplification from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Simplify a loan network with the cycle canceller
//! debt-netting simplify --input loans.json --algorithm cycle
//!
//! # Same, as JSON
//! debt-netting simplify --input loans.json --algorithm greedy --format json
//!
//! # Generate a random network for testing
//! debt-netting generate --nodes 20 --probability 0.3 --output loans.json
//! ```

use debt_netting::core::graph::LedgerGraph;
use debt_netting::core::loan::LoanRecord;
use debt_netting::optimization::cycle_cancel::CycleCanceller;
use debt_netting::optimization::greedy::GreedyMatcher;
use debt_netting::optimization::linear::LinearMatcher;
use debt_netting::optimization::{SimplificationReport, Simplifier};
use debt_netting::simulation::random_graph::{generate_random_graph, NetworkConfig};
use log::info;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"debt-netting — debt graph simplification

USAGE:
    debt-netting <COMMAND> [OPTIONS]

COMMANDS:
    simplify    Simplify a loan network with a chosen strategy
    generate    Generate a random loan network (for testing)
    help        Show this message

OPTIONS (simplify):
    --input <FILE>        Path to a JSON loans file
    --algorithm <NAME>    linear (default), greedy, or cycle
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (generate):
    --nodes <N>           Number of nodes (default: 10)
    --probability <P>     Arc probability per ordered pair (default: 0.3)
    --max-amount <W>      Maximum loan amount (default: 1000)
    --output <FILE>       Write to file instead of stdout

EXAMPLES:
    debt-netting simplify --input loans.json --algorithm cycle
    debt-netting simplify --input loans.json --algorithm greedy --format json
    debt-netting generate --nodes 20 --probability 0.4 --output loans.json"#
    );
}

/// JSON schema for loan files.
#[derive(serde::Serialize, serde::Deserialize)]
struct LoansFile {
    loans: Vec<LoanRecord>,
}

/// JSON output schema for simplification results.
#[derive(serde::Serialize)]
struct SimplifyOutput {
    algorithm: String,
    report: SimplificationReport,
    positions: Vec<PositionOutput>,
    loans: Vec<LoanRecord>,
}

#[derive(serde::Serialize)]
struct PositionOutput {
    node: String,
    equity: i64,
    status: String,
}

fn load_graph(path: &str) -> LedgerGraph {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: LoansFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "loans": [
    {{ "from": "alice", "to": "bob", "amount": 250 }}
  ]
}}"#
        );
        process::exit(1);
    });

    LedgerGraph::from_loans(&file.loans).unwrap_or_else(|e| {
        eprintln!("Invalid loan network: {}", e);
        process::exit(1);
    })
}

fn pick_algorithm(name: &str) -> Box<dyn Simplifier> {
    match name {
        "linear" => Box::new(LinearMatcher),
        "greedy" => Box::new(GreedyMatcher),
        "cycle" => Box::new(CycleCanceller),
        _ => {
            eprintln!("Unknown algorithm '{}': expected linear, greedy, or cycle", name);
            process::exit(1);
        }
    }
}

fn cmd_simplify(args: &[String]) {
    let mut input_path = None;
    let mut algorithm = "linear".to_string();
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--algorithm" => {
                i += 1;
                algorithm = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--algorithm requires linear, greedy, or cycle");
                    process::exit(1);
                });
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let graph = load_graph(&path);
    info!(
        "loaded {} nodes, {} loans from '{}'",
        graph.len(),
        graph.edge_amount(),
        path
    );

    let strategy = pick_algorithm(&algorithm);
    let result = strategy.simplify(&graph);
    let report = SimplificationReport::compare(&graph, &result);

    if format == "json" {
        let mut positions: Vec<PositionOutput> = result
            .nodes()
            .filter(|(_, node)| node.equity() != 0)
            .map(|(_, node)| PositionOutput {
                node: node.name().to_string(),
                equity: node.equity(),
                status: if node.equity() > 0 {
                    "CREDITOR".to_string()
                } else {
                    "DEBTOR".to_string()
                },
            })
            .collect();
        positions.sort_by(|a, b| a.node.cmp(&b.node));

        let output = SimplifyOutput {
            algorithm,
            report,
            positions,
            loans: result.to_loans(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("{}", report);
        println!("Settled loans:");
        for loan in result.to_loans() {
            println!("  {}", loan);
        }
        println!("\nNet positions:");
        for (_, node) in result.nodes() {
            if node.equity() != 0 {
                println!("  {}", node);
            }
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = NetworkConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--nodes" => {
                i += 1;
                config.node_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--nodes requires a number");
                    process::exit(1);
                });
            }
            "--probability" => {
                i += 1;
                config.arc_probability =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--probability requires a number in [0, 1]");
                        process::exit(1);
                    });
            }
            "--max-amount" => {
                i += 1;
                config.max_amount = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--max-amount requires a positive number");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let graph = generate_random_graph(&config);
    let file = LoansFile {
        loans: graph.to_loans(),
    };
    let json = serde_json::to_string_pretty(&file).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} loans across {} nodes -> {}",
            file.loans.len(),
            config.node_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "simplify" => cmd_simplify(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
