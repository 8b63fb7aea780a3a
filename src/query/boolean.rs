//! Boolean search expressions
//!
//! Phrases may combine terms with the case-sensitive keywords `AND`, `OR` and
//! `NOT`. Operators are applied strictly left to right, so
//! `A AND B OR C` means `(A AND B) OR C`. Adjacent terms without an operator
//! are joined with `AND`.
//!
//! Anything that is not an operator in operator position is a literal term:
//! a double-quoted run, a backslash-escaped keyword (`\AND`), or a keyword
//! that appears where a term is expected (leading, trailing or doubled).

use std::fmt;

/// A literal search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub text: String,
    /// Came from a double-quoted run and must match as a whole phrase
    pub quoted: bool,
}

impl Term {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            _ => None,
        }
    }

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Term(Term),
    Op(Operator),
}

/// Parsed boolean expression, left-associative
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BooleanExpr {
    Term(Term),
    And(Box<BooleanExpr>, Box<BooleanExpr>),
    Or(Box<BooleanExpr>, Box<BooleanExpr>),
    /// Left side must hold and right side must not
    Not(Box<BooleanExpr>, Box<BooleanExpr>),
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut text = String::new();
            for ch in chars.by_ref() {
                if ch == '"' {
                    break;
                }
                text.push(ch);
            }
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                tokens.push(Token::Term(Term::quoted(text)));
            }
            continue;
        }

        let mut word = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            word.push(ch);
            chars.next();
        }

        if let Some(op) = Operator::from_keyword(&word) {
            tokens.push(Token::Op(op));
        } else if let Some(escaped) = word.strip_prefix('\\')
            && Operator::from_keyword(escaped).is_some()
        {
            tokens.push(Token::Term(Term::plain(escaped)));
        } else {
            tokens.push(Token::Term(Term::plain(word)));
        }
    }

    tokens
}

fn combine(op: Operator, left: BooleanExpr, right: BooleanExpr) -> BooleanExpr {
    let (l, r) = (Box::new(left), Box::new(right));
    match op {
        Operator::And => BooleanExpr::And(l, r),
        Operator::Or => BooleanExpr::Or(l, r),
        Operator::Not => BooleanExpr::Not(l, r),
    }
}

impl BooleanExpr {
    /// Parse a phrase; returns `None` when it contains no terms at all
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut expr: Option<BooleanExpr> = None;
        let mut pending: Option<Operator> = None;

        let push_term = |expr: &mut Option<BooleanExpr>, pending: &mut Option<Operator>, term| {
            let term = BooleanExpr::Term(term);
            *expr = Some(match (expr.take(), pending.take()) {
                (None, _) => term,
                (Some(left), Some(op)) => combine(op, left, term),
                (Some(left), None) => combine(Operator::And, left, term),
            });
        };

        for token in tokenize(input) {
            match token {
                Token::Op(op) if expr.is_some() && pending.is_none() => pending = Some(op),
                Token::Op(op) => push_term(&mut expr, &mut pending, Term::plain(op.keyword())),
                Token::Term(term) => push_term(&mut expr, &mut pending, term),
            }
        }

        // Trailing operator has nothing to apply to
        if let Some(op) = pending.take() {
            push_term(&mut expr, &mut None, Term::plain(op.keyword()));
        }

        expr
    }

    /// Whether the phrase used any explicit operator
    #[must_use]
    pub fn has_explicit_operators(input: &str) -> bool {
        let tokens = tokenize(input);
        tokens.iter().enumerate().any(|(i, t)| {
            matches!(t, Token::Op(_)) && i > 0 && i + 1 < tokens.len()
        })
    }

    /// All literal terms in order of appearance
    #[must_use]
    pub fn terms(&self) -> Vec<&Term> {
        let mut out = Vec::new();
        self.collect_terms(&mut out, true);
        out
    }

    /// Terms whose presence contributes to a match (excludes `NOT` operands)
    #[must_use]
    pub fn positive_terms(&self) -> Vec<&Term> {
        let mut out = Vec::new();
        self.collect_terms(&mut out, false);
        out
    }

    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a Term>, include_negated: bool) {
        match self {
            BooleanExpr::Term(t) => out.push(t),
            BooleanExpr::And(l, r) | BooleanExpr::Or(l, r) => {
                l.collect_terms(out, include_negated);
                r.collect_terms(out, include_negated);
            }
            BooleanExpr::Not(l, r) => {
                l.collect_terms(out, include_negated);
                if include_negated {
                    r.collect_terms(out, include_negated);
                }
            }
        }
    }

    /// Evaluate against a term predicate
    pub fn evaluate<F>(&self, contains: &F) -> bool
    where
        F: Fn(&Term) -> bool,
    {
        match self {
            BooleanExpr::Term(t) => contains(t),
            BooleanExpr::And(l, r) => l.evaluate(contains) && r.evaluate(contains),
            BooleanExpr::Or(l, r) => l.evaluate(contains) || r.evaluate(contains),
            BooleanExpr::Not(l, r) => l.evaluate(contains) && !r.evaluate(contains),
        }
    }

    fn is_term(&self) -> bool {
        matches!(self, BooleanExpr::Term(_))
    }

    /// Render for the bedesten (Solr-backed) search API
    ///
    /// `AND` becomes whitespace, `NOT` a `-` prefix, and an `OR` between two
    /// plain words a regex alternation, which that API handles more reliably
    /// than a bare `OR`.
    #[must_use]
    pub fn to_solr(&self) -> String {
        fn child(e: &BooleanExpr) -> String {
            if e.is_term() {
                e.to_solr()
            } else {
                format!("({})", e.to_solr())
            }
        }

        match self {
            // A literal keyword is only safe as a one-word phrase
            BooleanExpr::Term(t) if t.quoted || Operator::from_keyword(&t.text).is_some() => {
                format!("\"{}\"", t.text)
            }
            BooleanExpr::Term(t) => t.text.clone(),
            BooleanExpr::And(l, r) => format!("{} {}", child(l), child(r)),
            BooleanExpr::Or(l, r) => match (l.as_ref(), r.as_ref()) {
                (BooleanExpr::Term(a), BooleanExpr::Term(b)) if !a.quoted && !b.quoted => {
                    format!("/({}|{})/", a.text, b.text)
                }
                _ => format!("{} OR {}", child(l), child(r)),
            },
            BooleanExpr::Not(l, r) => format!("{} -{}", child(l), child(r)),
        }
    }
}

/// Canonical, fully parenthesised rendering used for mevzuat.gov.tr
impl fmt::Display for BooleanExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn child(e: &BooleanExpr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if e.is_term() {
                write!(f, "{e}")
            } else {
                write!(f, "({e})")
            }
        }

        match self {
            BooleanExpr::Term(t) if t.quoted => write!(f, "\"{}\"", t.text),
            BooleanExpr::Term(t) if Operator::from_keyword(&t.text).is_some() => {
                write!(f, "\\{}", t.text)
            }
            BooleanExpr::Term(t) => f.write_str(&t.text),
            BooleanExpr::And(l, r) | BooleanExpr::Or(l, r) | BooleanExpr::Not(l, r) => {
                let op = match self {
                    BooleanExpr::And(..) => Operator::And,
                    BooleanExpr::Or(..) => Operator::Or,
                    _ => Operator::Not,
                };
                child(l, f)?;
                write!(f, " {} ", op.keyword())?;
                child(r, f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> BooleanExpr {
        BooleanExpr::Term(Term::plain(s))
    }

    #[test]
    fn conjunction_of_two_terms() {
        let expr = BooleanExpr::parse("ceza AND hukuk").unwrap();
        assert_eq!(
            expr,
            BooleanExpr::And(Box::new(term("ceza")), Box::new(term("hukuk")))
        );
        assert_eq!(expr.to_string(), "ceza AND hukuk");
    }

    #[test]
    fn operators_are_left_associative() {
        let expr = BooleanExpr::parse("ceza AND hukuk OR idare").unwrap();
        assert_eq!(
            expr,
            BooleanExpr::Or(
                Box::new(BooleanExpr::And(
                    Box::new(term("ceza")),
                    Box::new(term("hukuk"))
                )),
                Box::new(term("idare"))
            )
        );
        assert_eq!(expr.to_string(), "(ceza AND hukuk) OR idare");
    }

    #[test]
    fn lowercase_keywords_are_literal_terms() {
        let expr = BooleanExpr::parse("ceza and hukuk").unwrap();
        let texts: Vec<_> = expr.terms().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["ceza", "and", "hukuk"]);
    }

    #[test]
    fn misplaced_and_escaped_operators_are_literal() {
        let leading = BooleanExpr::parse("NOT ceza").unwrap();
        assert_eq!(leading.terms().len(), 2);

        let escaped = BooleanExpr::parse("ceza \\OR hukuk").unwrap();
        let texts: Vec<_> = escaped.terms().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["ceza", "OR", "hukuk"]);

        let trailing = BooleanExpr::parse("ceza AND").unwrap();
        assert_eq!(trailing.terms().len(), 2);
    }

    #[test]
    fn quoted_runs_are_single_terms() {
        let expr = BooleanExpr::parse("\"mali  sıkıntı\" NOT kurum").unwrap();
        let terms = expr.terms();
        assert_eq!(terms[0], &Term::quoted("mali sıkıntı"));
        assert_eq!(expr.positive_terms().len(), 1);
    }

    #[test]
    fn evaluates_not_as_exclusion() {
        let expr = BooleanExpr::parse("vergi NOT harç").unwrap();
        assert!(expr.evaluate(&|t: &Term| t.text == "vergi"));
        assert!(!expr.evaluate(&|_t: &Term| true));
    }

    #[test]
    fn solr_rendering() {
        assert_eq!(
            BooleanExpr::parse("ceza AND hukuk").unwrap().to_solr(),
            "ceza hukuk"
        );
        assert_eq!(
            BooleanExpr::parse("ceza OR hukuk").unwrap().to_solr(),
            "/(ceza|hukuk)/"
        );
        assert_eq!(
            BooleanExpr::parse("vergi NOT harç").unwrap().to_solr(),
            "vergi -harç"
        );
    }

    #[test]
    fn literal_keywords_are_quoted_for_solr() {
        assert_eq!(
            BooleanExpr::parse("ceza \\AND hukuk").unwrap().to_solr(),
            "(ceza \"AND\") hukuk"
        );
        assert_eq!(BooleanExpr::parse("NOT ceza").unwrap().to_solr(), "\"NOT\" ceza");
        assert_eq!(BooleanExpr::parse("ceza AND").unwrap().to_solr(), "ceza \"AND\"");
    }

    #[test]
    fn empty_input_has_no_expression() {
        assert!(BooleanExpr::parse("   ").is_none());
        assert!(BooleanExpr::parse("\"\"").is_none());
    }
}
