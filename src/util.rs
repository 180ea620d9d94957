use {
    clap::Parser,
    memmap::Mmap,
    nom::{
        bytes::complete::take_till,
        character::complete::digit1,
        combinator::map_res,
        multi::many0,
        sequence::{preceded, terminated},
        IResult,
    },
    std::{
        fs::File,
        io::{Error as IoError, ErrorKind, Result as IoResult},
        str::{from_utf8, FromStr, Utf8Error},
    },
};

/// Arguments for program execution
#[derive(Debug, Parser)]
pub struct Args {
    /// Input file path
    #[arg(short, long, default_value_t)]
    input_file_path: String,

    /// Time horizon for the weighted-sum report
    #[arg(long, default_value_t = 24_u16)]
    pub sum_horizon: u16,

    /// Time horizon for the product report
    #[arg(long, default_value_t = 32_u16)]
    pub product_horizon: u16,

    /// Number of leading scenarios contributing to the product report
    #[arg(long, default_value_t = 3_usize)]
    pub product_cutoff: usize,

    /// Print per-scenario timing information
    #[arg(short, long, default_value_t)]
    pub verbose: bool,
}

impl Args {
    /// Returns the input file path, or a provided default if the field is empty
    pub fn input_file_path<'a>(&'a self, default: &'a str) -> &'a str {
        if self.input_file_path.is_empty() {
            default
        } else {
            &self.input_file_path
        }
    }
}

pub trait Parse: Sized {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self>;
}

pub fn parse_uint<I: FromStr>(input: &str) -> IResult<&str, I> {
    map_res(digit1, I::from_str)(input)
}

/// Scans a line prefix for decimal integer tokens, skipping the text between them
///
/// Parsing stops at the first line ending; whatever non-digit text trails the last integer on the
/// line is consumed.
pub fn line_uints<I: FromStr>(input: &str) -> IResult<&str, Vec<I>> {
    terminated(
        many0(preceded(
            take_till(|c: char| c.is_ascii_digit() || c == '\n'),
            parse_uint::<I>,
        )),
        take_till(|c: char| c == '\n'),
    )(input)
}

/// Opens a memory-mapped UTF-8 file at a specified path, and passes in a `&str` over the file to a
/// provided callback function
///
/// # Arguments
///
/// * `file_path` - A string slice file path to open as a read-only file
/// * `f` - A callback function to invoke on the contents of the file as a string slice
///
/// # Errors
///
/// This function returns a `Result::Err`-wrapped `std::io::Error` if an error has occurred.
/// Possible causes are:
///
/// * `std::fs::File::open` was unable to open a read-only file at `file_path`
/// * `memmap::Mmap::map` fails to create an `Mmap` instance for the opened file
/// * `std::str::from_utf8` determines the file is not in valid UTF-8 format
///
/// `f` is only executed *iff* an error is not encountered.
///
/// # Safety
///
/// This function uses `Mmap::map`, which is an unsafe function. There is no guarantee that an
/// external process won't modify the file after it is opened as read-only.
///
/// # Undefined Behavior
///
/// Related to the **Safety** section above, it is UB if the opened file is modified by an external
/// process while this function is referring to it as an immutable string slice. For more info on
/// this, see:
///
/// * https://www.reddit.com/r/rust/comments/wyq3ih/why_are_memorymapped_files_unsafe/
/// * https://users.rust-lang.org/t/how-unsafe-is-mmap/19635
/// * https://users.rust-lang.org/t/is-there-no-safe-way-to-use-mmap-in-rust/70338
pub unsafe fn open_utf8_file<T, F: FnOnce(&str) -> T>(file_path: &str, f: F) -> IoResult<T> {
    let file: File = File::open(file_path)?;

    // SAFETY: This operation is unsafe
    let mmap: Mmap = Mmap::map(&file)?;
    let bytes: &[u8] = &mmap;
    let utf8_str: &str = from_utf8(bytes).map_err(|utf8_error: Utf8Error| -> IoError {
        IoError::new(ErrorKind::InvalidData, utf8_error)
    })?;

    Ok(f(utf8_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_uints() {
        assert_eq!(
            line_uints::<u16>("Record 1: costs 4 and 14, then 7.\nRecord 2: 9"),
            Ok(("\nRecord 2: 9", vec![1_u16, 4_u16, 14_u16, 7_u16]))
        );
        assert_eq!(line_uints::<u16>("no digits here"), Ok(("", Vec::new())));
        assert_eq!(line_uints::<u16>(""), Ok(("", Vec::new())));
    }

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint::<u16>("24 more"), Ok((" more", 24_u16)));
        assert!(parse_uint::<u16>("x24").is_err());
    }
}
