fn main() {
    if let Err(err) = ev_survey_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
