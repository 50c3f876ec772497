use trellis::cli;

fn main() {
    cli::run();
}
