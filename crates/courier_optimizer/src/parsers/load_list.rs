use std::{fs::File, io::Read, path::Path};

use tracing::debug;

use crate::{
    parsers::parser::{InputError, LoadsParser},
    problem::{load::Load, location::Location},
};

/// Parser for the line-oriented load list:
///
/// ```text
/// loadNumber pickup dropoff
/// 1 (-50.1,80.0) (90.1,12.2)
/// 2 (0.3,8.9) (40.9,55.0)
/// ```
///
/// Three whitespace-separated fields per line: a positive integer index
/// and two parenthesized `x,y` coordinates. Lines that do not parse as a
/// data row are skipped, which is also how the header is absorbed.
pub struct LoadListParser;

impl LoadsParser for LoadListParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<Vec<Load>, InputError> {
        let path = file.as_ref();
        let mut file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        Ok(parse(&content))
    }
}

pub fn parse(text: &str) -> Vec<Load> {
    let mut loads = Vec::new();
    for line in text.lines() {
        match load_from_line(line) {
            Some(load) => loads.push(load),
            None if line.trim().is_empty() => {}
            None => debug!(line, "skipped non-data line"),
        }
    }
    loads
}

fn load_from_line(line: &str) -> Option<Load> {
    let mut fields = line.split_whitespace();
    let index = fields.next()?;
    let pickup = fields.next()?;
    let dropoff = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    let index: usize = index.parse().ok()?;
    if index == 0 {
        return None;
    }

    Some(Load::new(
        index,
        parse_coords(pickup)?,
        parse_coords(dropoff)?,
    ))
}

/// Expected style: `(12.34,56.78)`
fn parse_coords(field: &str) -> Option<Location> {
    let inner = field.strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some(Location::from_cartesian(
        x.trim().parse().ok()?,
        y.trim().parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
loadNumber pickup dropoff
1 (-9.1,5.5) (12.2,3.3)
2 (0.25,8.0) (4.0,-55.75)

not a data row at all
3 (1,2) (3,4)
";

    #[test]
    fn test_parse_skips_header_and_garbage() {
        let loads = parse(SAMPLE);

        assert_eq!(loads.len(), 3);
        assert_eq!(loads[0].index(), 1);
        assert_eq!(loads[0].pickup().x(), -9.1);
        assert_eq!(loads[0].pickup().y(), 5.5);
        assert_eq!(loads[0].dropoff().x(), 12.2);
        assert_eq!(loads[1].dropoff().y(), -55.75);
        assert_eq!(loads[2].index(), 3);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "\
0 (1,2) (3,4)
-5 (1,2) (3,4)
6 (1;2) (3,4)
7 (1,2) (3,4) extra
8 (1,2 (3,4)
9 (1,2) (3,4)
";
        let loads = parse(text);
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].index(), 9);
    }

    #[test]
    fn test_open_error_kind() {
        let err = LoadListParser
            .parse("/definitely/not/here.txt")
            .unwrap_err();
        assert!(matches!(err, InputError::Open { .. }));
    }
}
