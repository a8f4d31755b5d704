fn main() {
    if let Err(err) = erd_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
