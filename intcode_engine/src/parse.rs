// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Program text parsing.
//!
//! Programs are exchanged as comma-separated ASCII base-10 signed integers
//! with no header, length prefix, or trailing delimiter. Parsing loads the
//! words in order starting at address 0.

use alloc::vec::Vec;
use core::fmt;

/// A program text parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The program text held no words at all.
    Empty,
    /// A field was not a base-10 signed integer.
    InvalidInteger {
        /// Zero-based field index within the program text.
        index: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty program text"),
            Self::InvalidInteger { index } => {
                write!(f, "invalid integer at field {index}")
            }
        }
    }
}

impl core::error::Error for ParseError {}

/// Parses a comma-separated program text into its word image.
///
/// ASCII whitespace around the whole text and around individual fields is
/// tolerated; anything else in a field is an error.
pub fn parse_program(text: &str) -> Result<Vec<i64>, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    text.split(',')
        .enumerate()
        .map(|(index, field)| {
            field
                .trim()
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidInteger { index })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ParseError, parse_program};
    use alloc::vec;

    #[test]
    fn parses_signed_words_in_order() {
        assert_eq!(
            parse_program("3,9,8,9,10,9,4,9,99,-1,8").unwrap(),
            vec![3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8]
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_program(" 1, 0 ,0,3,99\n").unwrap(), vec![1, 0, 0, 3, 99]);
    }

    #[test]
    fn parses_constants_past_32_bit_range() {
        assert_eq!(
            parse_program("104,1125899906842624,99").unwrap(),
            vec![104, 1_125_899_906_842_624, 99]
        );
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!(parse_program(""), Err(ParseError::Empty));
        assert_eq!(parse_program("  \n"), Err(ParseError::Empty));
    }

    #[test]
    fn reports_the_offending_field() {
        assert_eq!(
            parse_program("1,,2"),
            Err(ParseError::InvalidInteger { index: 1 })
        );
        assert_eq!(
            parse_program("1,2,x"),
            Err(ParseError::InvalidInteger { index: 2 })
        );
    }
}
