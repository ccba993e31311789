use finance_tracker::app;

fn main() {
    app::init_tracing();
    if let Err(e) = app::run(std::env::args()) {
        tracing::error!(error = %e, "finance-tracker failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
