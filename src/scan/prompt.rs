//! Interactive ticker entry

use std::io::{BufRead, Write};

use crate::core::{OtmError, OtmResult};

use super::normalize_ticker;

/// Ask for a ticker on `output` and read one line from `input`
pub fn prompt_ticker<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> OtmResult<String> {
    write!(output, "Enter the stock ticker: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(OtmError::invalid_ticker("no ticker entered"));
    }

    normalize_ticker(&line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_reads_one_line() {
        let mut input = Cursor::new("aapl\nmsft\n");
        let mut output = Vec::new();

        let ticker = prompt_ticker(&mut input, &mut output).unwrap();

        assert_eq!(ticker, "AAPL");
        assert_eq!(String::from_utf8(output).unwrap(), "Enter the stock ticker: ");
    }

    #[test]
    fn test_prompt_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(matches!(
            prompt_ticker(&mut input, &mut output),
            Err(OtmError::InvalidTicker(_))
        ));
    }
}
