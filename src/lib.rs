pub mod cmds;
pub mod config;
pub mod controller;
pub mod date;
pub mod error;
pub mod months;
pub mod paging;
pub mod range;
pub mod state;

pub use controller::{CalendarController, SelectionListener};
pub use date::CalendarDate;
pub use error::{Error, ErrorKind, Result};
pub use months::MonthSequence;
pub use paging::Paging;
pub use range::DateRange;
pub use state::SavedState;
