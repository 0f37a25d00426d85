mod args;
mod setup;

use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    debug!("args: {:?}", args);

    let res = setup::resolve_settings(&args).and_then(|settings| setup::run_setup(&settings));
    match res {
        Ok(survey) => {
            println!("Published URL: {}", survey.published_url);
            println!("Editor URL: {}", survey.edit_url);
        }
        Err(e) => {
            eprintln!("An error occured: {}", e);
            for cause in ErrorCompat::iter_chain(&e).skip(1) {
                eprintln!("  caused by: {}", cause);
            }
            std::process::exit(1);
        }
    }
}
