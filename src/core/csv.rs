//! Permissive CSV tokenizer
//!
//! Single left-to-right scan with one character of lookahead. Handles
//! standard double-quote quoting with `""` escapes, bare LF / CR / CRLF
//! line terminators, and files without a trailing newline.

/// Split raw CSV text into rows of string cells.
///
/// An unterminated quote at end of input is treated as implicitly closed;
/// the partial field is kept rather than dropped.
pub(crate) fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut cell));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }

    // flush a trailing row when the file has no final newline
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn splits_cells_and_rows() {
        let rows = tokenize("a,b,c\nd,e,f\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn last_row_without_trailing_newline_is_kept() {
        let rows = tokenize("a,b\nc,d");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn crlf_is_one_terminator() {
        let rows = tokenize("a,b\r\nc,d\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn bare_cr_ends_row() {
        let rows = tokenize("a\rb");
        assert_eq!(rows, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn quoted_cell_keeps_comma_and_newline() {
        let rows = tokenize("\"a,b\",\"c\nd\"\n");
        assert_eq!(rows, vec![vec!["a,b", "c\nd"]]);
    }

    #[test]
    fn escaped_quote_emits_literal_quote() {
        let rows = tokenize("\"say \"\"hi\"\"\",x\n");
        assert_eq!(rows, vec![vec!["say \"hi\"", "x"]]);
    }

    #[test]
    fn blank_line_is_a_single_empty_cell() {
        let rows = tokenize("a\n\nb\n");
        assert_eq!(rows, vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn unterminated_quote_keeps_field() {
        let rows = tokenize("a,\"unclosed");
        assert_eq!(rows, vec![vec!["a", "unclosed"]]);
    }

    #[test]
    fn empty_cells_are_preserved() {
        let rows = tokenize(",a,,\n");
        assert_eq!(rows, vec![vec!["", "a", "", ""]]);
    }

    #[test]
    fn round_trips_quoted_values() {
        // wrapping a value in quotes (doubling embedded quotes) must tokenize
        // back to the original value exactly
        for original in ["plain", "a,b", "line\nbreak", "quo\"te", "\"all\",\nmixed\""] {
            let encoded = format!("\"{}\"", original.replace('"', "\"\""));
            let rows = tokenize(&encoded);
            assert_eq!(rows, vec![vec![original.to_string()]]);
        }
    }
}
