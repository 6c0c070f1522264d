//! Splits delimited text into records of raw fields.
//!
//! Quoting follows RFC 4180: a field that starts with the quote character
//! runs until the next lone quote, a doubled quote stands for one quote
//! character, and delimiters or line breaks inside quotes are data.
//! `\n`, `\r\n` and `\r` all end a record.

use std::mem::take;

pub(crate) struct Record {
    /// 1-based line the record starts on.
    pub line: usize,
    pub fields: Vec<String>,
}

enum State {
    FieldStart,
    Unquoted,
    Quoted,
    AfterQuote,
}

pub(crate) fn parse_records(text: &str, delimiter: char, quote: char) -> Vec<Record> {
    //! Tokenize the whole input.
    //!
    //! A line break right before the end of input does not start another
    //! record. An empty line anywhere else is a record of one empty field.

    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let State::Quoted = state {
            if c == quote {
                if chars.peek() == Some(&quote) {
                    chars.next();
                    field.push(quote);
                } else {
                    state = State::AfterQuote;
                }
            } else {
                if c == '\n' || (c == '\r' && chars.peek() != Some(&'\n')) {
                    line += 1;
                }
                field.push(c);
            }
            continue;
        }

        if c == delimiter {
            fields.push(take(&mut field));
            state = State::FieldStart;
        } else if c == '\n' || c == '\r' {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            fields.push(take(&mut field));
            records.push(Record {
                line: record_line,
                fields: take(&mut fields),
            });
            line += 1;
            record_line = line;
            state = State::FieldStart;
        } else if c == quote && matches!(state, State::FieldStart) {
            state = State::Quoted;
        } else {
            // anything after a closing quote is kept as plain text
            field.push(c);
            state = State::Unquoted;
        }
    }

    if !matches!(state, State::FieldStart) || !fields.is_empty() {
        fields.push(field);
        records.push(Record {
            line: record_line,
            fields,
        });
    }

    records
}
