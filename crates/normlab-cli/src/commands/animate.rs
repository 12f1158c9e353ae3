use super::RunArgs;

pub fn run(args: &RunArgs) {
    let config = super::config_or_exit(args);
    let mut app = match crate::tui::app::App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Cannot start simulation: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
    app.print_summary();
}
