use clap::Parser;
use env_logger::Env;
use log::info;
use std::process::ExitCode;

use tif_mean::cli::Args;
use tif_mean::{handle_request, MeanRequest, NodataPolicy};

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== GeoTIFF Mean ===");

    let request = MeanRequest {
        input_folder: args.input_dir,
        output_file: args.output,
        nodata_policy: if args.skip_nodata {
            NodataPolicy::Exclude
        } else {
            NodataPolicy::Include
        },
    };

    let status = handle_request(&request);
    println!("{}", status);

    if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
