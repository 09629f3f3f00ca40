mod config;
mod library;
mod presence;
mod remote;
mod runtime;
mod session;
mod transport;

fn main() {
    colog::init();

    if let Err(e) = runtime::run() {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}
