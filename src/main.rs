fn main() {
    if let Err(err) = mysql_preflight::cli::run() {
        mysql_preflight::ui::eprintln_error(&err);
        std::process::exit(mysql_preflight::exit::exit_code(&err));
    }
}
