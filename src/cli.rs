//! CLI domain: parse, route, output, and presentation only.
//! No pipeline logic; the route table dispatches to the pipeline and catalog services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_run_report, format_validate_report, ValidateReport};
pub use route::RunContext;
