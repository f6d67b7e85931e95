// file: src/main.rs
// version: 1.2.0
// guid: h8i9j0k1-l2m3-4567-8901-234567hijklm

//! Skyforge CLI entry point

use skyforge::commands::{default_app, Invocation};
use skyforge::logging::init_logger;
use skyforge::options::GlobalOptions;

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let app = default_app();
    let matches = match app.parse() {
        Ok(matches) => matches,
        // Help, version and usage errors are clap's to render; its exit
        // codes already distinguish them.
        Err(err) => err.exit(),
    };

    let options = GlobalOptions::from_matches(&matches);
    if let Err(err) = init_logger(options.enable_debug_logging) {
        eprintln!("sky: {}", err);
        return 1;
    }

    let invocation = Invocation::from_process(options);
    match app.dispatch(&matches, &invocation).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("sky: {}", err);
            // Environment defects end the process with their own code so
            // scripts can tell a broken host from a failed command.
            if err.is_fatal() {
                2
            } else {
                1
            }
        }
    }
}
