use report_engine::{logging, pipeline};
use std::env;
use std::path::Path;

fn main() {
    // Initialize global logging system
    if let Err(message) = logging::init_global_logging() {
        logging::safe_log_error(
            logging::codes::system::INITIALIZATION_FAILURE,
            &format!("Failed to initialize logging: {}", message),
        );
        std::process::exit(1);
    }

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <raw-data-folder>", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return;
    }

    let input_path = Path::new(&args[1]);
    if !input_path.is_dir() {
        eprintln!("Error: Input must be a folder containing raw measurement data");
        eprintln!("  Folder: {}", input_path.display());
        std::process::exit(1);
    }

    match pipeline::process_run(input_path) {
        Ok(result) => {
            println!();
            println!("Report saved in");
            println!("{}", result.report_path.display());
            logging::print_diagnostics_summary();
        }
        Err(error) => {
            logging::safe_log_error(error.code(), &format!("Run aborted: {}", error));
            logging::print_diagnostics_summary();
            std::process::exit(1);
        }
    }
}

fn print_help(program_name: &str) {
    println!("Report Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("Test record normalization and report assembly");
    println!();
    println!("USAGE:");
    println!("    {} <raw-data-folder>", program_name);
    println!();
    println!("ARGUMENTS:");
    println!("    <raw-data-folder>    Folder holding the measurement tables (.csv),");
    println!("                         report pictures (.png) and waveform captures (.mat)");
    println!();
    println!("LAYOUT:");
    println!("    The configuration file Config_Tembo.txt is read from the 20_TestFlow");
    println!("    folder next to the raw data; the report document lands in a");
    println!("    timestamped folder under 50_Report and is then copied, together with");
    println!("    marked artifacts, to the network staging area.");
    println!();
    println!("EXIT CODES:");
    println!("    0    report written (data-quality warnings do not change this)");
    println!("    1    fatal configuration or input error");
}
