//! Normalization of free-form user polynomials into parser-acceptable syntax.
//!
//! Users write things like `4x^2 + 3` or `(1 + 2 n) (5 + 17 n (1 + n))`;
//! the parser wants explicit multiplication. `^` is already the grammar's
//! exponentiation operator, so it passes through untouched.

/// Rewrite a user-entered polynomial into the explicit-multiplication form
/// the parser accepts.
///
/// Whitespace is stripped, then `*` is inserted between a digit and a
/// letter (`4x`), between adjacent parenthesized groups (`)(`), and before
/// an opening parenthesis that follows an alphanumeric (`n(`, `2(`).
pub fn normalize(input: &str) -> String {
    let stripped: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(stripped.len() + 8);
    for (i, &c) in stripped.iter().enumerate() {
        if i > 0 {
            let prev = stripped[i - 1];
            let digit_letter = prev.is_ascii_digit() && c.is_ascii_alphabetic();
            let implicit_paren = c == '(' && (prev.is_ascii_alphanumeric() || prev == ')');
            if digit_letter || implicit_paren {
                out.push('*');
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn passthrough() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("4^x"), "4^x");
    }

    #[test]
    fn digit_letter_adjacency() {
        assert_eq!(normalize("4x^2+3"), "4*x^2+3");
        assert_eq!(normalize("4x^2+3x^5-1"), "4*x^2+3*x^5-1");
    }

    #[test]
    fn whitespace_is_stripped_before_insertion() {
        assert_eq!(normalize("4x^2 + 3x^5 - 1"), "4*x^2+3*x^5-1");
        assert_eq!(normalize("6x^2 - 2 - 4x"), "6*x^2-2-4*x");
    }

    #[test]
    fn adjacent_groups_multiply() {
        assert_eq!(
            normalize("(1 + 2 n) (5 + 17 n (1 + n))"),
            "(1+2*n)*(5+17*n*(1+n))"
        );
    }

    #[test]
    fn normalized_form_parses() {
        let text = normalize("(1 + 2 n) (5 + 17 n (1 + n))");
        assert!(crate::parse(&text).is_ok());
    }
}
