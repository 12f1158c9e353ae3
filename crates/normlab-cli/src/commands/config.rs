use super::RunArgs;

pub fn run(args: &RunArgs) {
    let cfg = super::config_or_exit(args);
    match serde_json::to_string_pretty(&cfg) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize configuration: {e}");
            std::process::exit(1);
        }
    }
}
