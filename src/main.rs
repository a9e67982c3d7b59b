use filetemplate::{
    cli::{get_args, get_log_level_from_verbose, run},
    error::default_error_handler,
};

fn main() {
    let cli = get_args();
    env_logger::Builder::new()
        .filter_level(get_log_level_from_verbose(cli.verbose))
        .format_timestamp_millis()
        .init();

    if let Err(err) = run(cli) {
        default_error_handler(err);
    }
}
