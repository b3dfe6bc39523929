use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{delimited, preceded, separated_pair},
    IResult,
};

use crate::date::{parse_date, CalendarDate};
use crate::error::{Error, ErrorKind, Result};

/// A request for the controller, either typed by a user or returned by a
/// selection listener as a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Noop,
    NextPage(usize),
    PrevPage(usize),
    ShowPosition(usize),
    ShowMonth(CalendarDate),
    Select(Option<CalendarDate>),
    SetRange(Option<CalendarDate>, Option<CalendarDate>),
    SelectToday,
    Exit,
}

fn count(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn optional_date(input: &str) -> IResult<&str, Option<CalendarDate>> {
    alt((map(parse_date, Some), value(None, char('-'))))(input)
}

fn steps(input: &str) -> IResult<&str, usize> {
    map(opt(preceded(space1, count)), |n| n.unwrap_or(1))(input)
}

fn paging(input: &str) -> IResult<&str, Cmd> {
    // `page` has to be tried before the `p` shorthand
    alt((
        map(preceded(tag("page"), preceded(space1, count)), Cmd::ShowPosition),
        map(preceded(alt((tag("next"), tag("n"))), steps), Cmd::NextPage),
        map(preceded(alt((tag("prev"), tag("p"))), steps), Cmd::PrevPage),
    ))(input)
}

fn dates(input: &str) -> IResult<&str, Cmd> {
    alt((
        map(
            preceded(tag("month"), preceded(space1, parse_date)),
            Cmd::ShowMonth,
        ),
        map(
            preceded(tag("select"), preceded(space1, optional_date)),
            Cmd::Select,
        ),
        map(
            preceded(
                tag("range"),
                preceded(space1, separated_pair(optional_date, space1, optional_date)),
            ),
            |(min, max)| Cmd::SetRange(min, max),
        ),
        value(Cmd::SelectToday, tag("today")),
    ))(input)
}

fn command(input: &str) -> IResult<&str, Cmd> {
    delimited(
        space0,
        alt((
            value(Cmd::Exit, alt((tag("quit"), tag("q")))),
            dates,
            paging,
        )),
        space0,
    )(input)
}

/// Parses one line of the command language, e.g. `next 3`,
/// `select 2020-06-15` or `range 2020-03-01 -`.
pub fn parse_cmd(line: &str) -> Result<Cmd> {
    if line.trim().is_empty() {
        return Ok(Cmd::Noop);
    }

    all_consuming(command)(line)
        .map(|(_, cmd)| cmd)
        .map_err(|err| {
            log::debug!("{}", Error::from(err));
            Error::from(ErrorKind::ParseError)
                .with_msg(&format!("unknown command '{}'", line.trim()))
        })
}
