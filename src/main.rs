fn main() {
    if let Err(err) = lifecal_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
