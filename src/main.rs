use covergrid::bench;

const USAGE: &str = "usage: covergrid --benchmark [--items N] [--runs N] [--columns C] \
[--min-rows R] [--mode width|height] [--gap PX] [--output FILE]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("covergrid=info".parse().unwrap()),
        )
        .init();

    let code = match bench::maybe_parse_args() {
        Ok(Some(args)) => match bench::run_benchmark(args) {
            Ok(code) => code,
            Err(err) => {
                tracing::error!("benchmark failed: {err:#}");
                1
            }
        },
        Ok(None) => {
            eprintln!("{USAGE}");
            2
        }
        Err(err) => {
            eprintln!("{err:#}\n{USAGE}");
            2
        }
    };
    std::process::exit(code);
}
