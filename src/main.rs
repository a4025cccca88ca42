//! autopunch main entrypoint.

use autopunch::run;

#[tokio::main]
async fn main() {
    println!();
    if let Err(e) = run().await {
        autopunch::ui::messages::error(&e);
        std::process::exit(1);
    }
}
