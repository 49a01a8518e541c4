fn main() {
    if let Err(err) = arrow_router::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
