fn main() {
    melcookie::cli::run();
}
