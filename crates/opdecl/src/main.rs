//! opdecl - C++ binding declaration generator.

fn main() {
    opdecl_cli::init_tracing();
    std::process::exit(opdecl_cli::run(std::env::args_os()));
}
