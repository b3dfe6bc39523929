extern crate calpage as lib;

use flexi_logger::{FileSpec, Logger};
use lib::cmds::{parse_cmd, Cmd};
use lib::config::load_suitable_config;
use lib::Paging;
use lib::{CalendarController, CalendarDate, SavedState};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "calpage",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Calpage - page through the months of a date range and select a day."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        long = "state",
        help = "path to state file (overrides the config)",
        parse(from_os_str)
    )]
    pub state_file: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn status(controller: &CalendarController) -> String {
    let month = controller.current_month();
    let name = month.month_of_year().map_or("?", |m| m.name());

    format!(
        "{} {:>9} {:<5} {} [{}/{}] selected: {}",
        if controller.can_page_backward() { "<" } else { " " },
        name,
        month.year(),
        if controller.can_page_forward() { ">" } else { " " },
        controller.current_position() + 1,
        controller.page_count(),
        controller
            .selected_date()
            .map_or_else(|| "-".to_owned(), |date| date.to_string())
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        eprintln!("Calpage ran into a fatal error!");
        eprintln!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let config = load_suitable_config(args.configfile.as_deref())?;
    let mut controller = CalendarController::from_config(&config)?;

    let state_file = args.state_file.or_else(|| config.state_file.clone());
    if let Some(path) = state_file.as_deref().filter(|path| path.is_file()) {
        match SavedState::load(path) {
            Ok(state) => controller.restore(&state)?,
            Err(err) => log::warn!("ignoring state file {}: {}", path.display(), err),
        }
    }

    controller.add_listener(|date: Option<CalendarDate>| {
        match date {
            Some(date) => println!("selection changed: {}", date),
            None => println!("selection cleared"),
        }
        Cmd::Noop
    });

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", status(&controller))?;

    for line in stdin.lock().lines() {
        match parse_cmd(&line?) {
            Ok(Cmd::Exit) => break,
            Ok(cmd) => {
                if let Err(err) = controller.send_cmd(&cmd) {
                    log::warn!("{:?} failed: {}", cmd, err);
                    eprintln!("{}", err);
                }
            }
            Err(err) => eprintln!("{}", err),
        }

        writeln!(stdout, "{}", status(&controller))?;
    }

    if let Some(path) = &state_file {
        controller.snapshot().save(path)?;
    }

    Ok(())
}
