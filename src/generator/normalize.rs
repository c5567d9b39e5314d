use icu_normalizer::DecomposingNormalizer;

/// Tab stops used when expanding tabs in fetched content.
pub const TAB_WIDTH: usize = 4;

/// Normalize fetched content into keyboard-typable practice text.
///
/// Three passes: typographic characters are mapped to ASCII equivalents,
/// the result is NFKD-decomposed with combining marks stripped (so accented
/// letters survive as their base letter), and whitespace is canonicalized
/// (LF line endings, tabs expanded, interior space runs collapsed, trailing
/// whitespace and surrounding blank lines trimmed).
pub fn normalize(text: &str) -> String {
    let replaced = replace_typographic(text);
    let decomposed = DecomposingNormalizer::new_nfkd().normalize(&replaced);
    let stripped: String = decomposed
        .chars()
        .filter(|&ch| !is_combining_mark(ch))
        .collect();
    canonicalize_whitespace(&stripped)
}

fn replace_typographic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            // Smart quotes and primes
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}' | '\u{2032}' | '\u{2035}' => {
                out.push('\'')
            }
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{201f}' | '\u{2033}' | '\u{2036}' => {
                out.push('"')
            }
            // Dashes and hyphens
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2212}' => out.push('-'),
            '\u{2014}' | '\u{2015}' => out.push_str("--"),
            '\u{2053}' => out.push('~'),
            // Ellipsis
            '\u{2026}' => out.push_str("..."),
            // Exotic spaces
            '\u{00a0}' | '\u{2000}'..='\u{200a}' | '\u{202f}' => out.push(' '),
            // Zero-width characters vanish
            '\u{200b}' | '\u{200c}' | '\u{200d}' => {}
            // Mathematical symbols
            '\u{00d7}' => out.push('x'),
            '\u{00f7}' => out.push('/'),
            '\u{00b1}' => out.push_str("+/-"),
            '\u{2260}' => out.push_str("!="),
            '\u{2264}' => out.push_str("<="),
            '\u{2265}' => out.push_str(">="),
            '\u{2217}' => out.push('*'),
            // Marks and bullets
            '\u{00a9}' => out.push_str("(c)"),
            '\u{00ae}' => out.push_str("(r)"),
            '\u{2122}' => out.push_str("TM"),
            '\u{2022}' | '\u{00b7}' | '\u{204e}' => out.push('*'),
            '\u{2043}' => out.push('-'),
            // Arrows
            '\u{2190}' => out.push_str("<-"),
            '\u{2192}' => out.push_str("->"),
            '\u{2194}' => out.push_str("<->"),
            '\u{2191}' => out.push('^'),
            '\u{2193}' => out.push('v'),
            // Guillemets and inverted punctuation
            '\u{00ab}' => out.push_str("<<"),
            '\u{00bb}' => out.push_str(">>"),
            '\u{00a1}' => out.push('!'),
            '\u{00bf}' => out.push('?'),
            _ => out.push(ch),
        }
    }
    out
}

/// Combining diacritical mark blocks dropped after NFKD decomposition.
fn is_combining_mark(ch: char) -> bool {
    matches!(
        ch,
        '\u{0300}'..='\u{036f}'
            | '\u{1ab0}'..='\u{1aff}'
            | '\u{1dc0}'..='\u{1dff}'
            | '\u{20d0}'..='\u{20ff}'
            | '\u{fe20}'..='\u{fe2f}'
    )
}

fn canonicalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = unified
        .split('\n')
        .map(|line| collapse_interior_spaces(&expand_tabs(line)))
        .collect();

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let width = TAB_WIDTH - (col % TAB_WIDTH);
            for _ in 0..width {
                out.push(' ');
            }
            col += width;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Collapse runs of spaces after the leading indentation (indentation is
/// structure in code content and must survive), trimming trailing whitespace.
fn collapse_interior_spaces(line: &str) -> String {
    let trimmed = line.trim_end();
    let indent_len = trimmed.chars().take_while(|&c| c == ' ').count();
    let mut out: String = " ".repeat(indent_len);
    let mut prev_space = false;
    for ch in trimmed.chars().skip(indent_len) {
        if ch == ' ' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out
}
