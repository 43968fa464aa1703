use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_positive_u64};
use super::types::{HttpMethod, OutputFormat, PositiveU64};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Paced async HTTP load generator - fires N requests every second and prints a per-second status histogram."
)]
pub struct RunArgs {
    /// HTTP method to use with the request
    #[arg(long, short = 'm', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// URL to make requests against
    #[arg(long, short)]
    pub url: Option<String>,

    /// Data (body) to send with the request (POST/PUT/PATCH)
    #[arg(long, short, default_value = "")]
    pub data: String,

    /// Number of requests to make each second
    #[arg(
        long = "rps",
        short = 'r',
        default_value = "1",
        value_parser = parse_positive_u64
    )]
    pub rps: PositiveU64,

    /// Length of time in seconds to run the requests. 0 runs until interrupted
    #[arg(long = "duration", short = 't', default_value_t = 0)]
    pub duration: u64,

    /// Hold each second's requests and release them together as one burst
    #[arg(long, short)]
    pub burst: bool,

    /// Per-request timeout (supports ms/s/m/h). Unset waits indefinitely
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Group summary format written to stdout
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Enables verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Path to a TOML or JSON config file (defaults to ./volley.toml or ./volley.json)
    #[arg(long, short)]
    pub config: Option<String>,
}
