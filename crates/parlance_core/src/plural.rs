//! Plural rules and plural-index resolution.
//!
//! A [`PluralRule`] maps a count to a [`PluralSelection`]: the number of forms
//! the locale has and the index of the form to use. Locale files describe
//! rules as gettext `Plural-Forms` headers:
//!
//! ```text
//! nplurals=2; plural=(n != 1);
//! nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;
//! nplurals=1; plural=0;
//! ```
//!
//! # Invariants
//!
//! 1. [`resolve_index`] always returns an index in `[0, total_forms - 1]`,
//!    whatever the rule computes.
//! 2. Rules are pure: the same count always yields the same selection.
//! 3. Expression evaluation never panics (wrapping arithmetic, division by
//!    zero yields 0).

use core::fmt;

use crate::error::PluralExprError;

/// Nesting limit for the expression tree (parentheses, unary and ternary
/// operators, and chained binary operators). Evaluation recurses once per
/// level, so this also bounds its stack use.
const MAX_DEPTH: usize = 64;

/// Result of evaluating a plural rule for one count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluralSelection {
    pub total_forms: i64,
    pub index: i64,
}

impl PluralSelection {
    /// Build a selection. `index` accepts anything integer-like, including
    /// `bool` (`true` -> 1, `false` -> 0).
    pub fn new(total_forms: i64, index: impl Into<i64>) -> Self {
        Self {
            total_forms,
            index: index.into(),
        }
    }
}

/// A locale's plural rule.
pub enum PluralRule {
    /// Parsed gettext `Plural-Forms` header.
    Expression(PluralExpr),
    /// Rule supplied as Rust code.
    Custom(Box<dyn Fn(i64) -> PluralSelection + Send + Sync>),
}

impl PluralRule {
    /// Parse a gettext `Plural-Forms` header.
    pub fn parse(header: &str) -> Result<Self, PluralExprError> {
        PluralExpr::parse(header).map(Self::Expression)
    }

    pub fn custom(rule: impl Fn(i64) -> PluralSelection + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(rule))
    }

    /// Evaluate the rule for `count`. The index is not clamped here.
    pub fn select(&self, count: i64) -> PluralSelection {
        match self {
            Self::Expression(expr) => expr.select(count),
            Self::Custom(rule) => rule(count),
        }
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression(expr) => write!(f, "PluralRule::Expression({:?})", expr.source),
            Self::Custom(_) => write!(f, "PluralRule::Custom(...)"),
        }
    }
}

/// Resolve the plural-form index for `count`.
///
/// Without a rule this is the binary singular/plural split: `1` selects form 0
/// and every other count (including 0 and negatives) selects form 1.
pub fn resolve_index(rule: Option<&PluralRule>, count: i64) -> usize {
    let Some(rule) = rule else {
        return if count == 1 { 0 } else { 1 };
    };

    let selection = rule.select(count);
    let last = selection.total_forms.max(1) - 1;
    // `last` is non-negative, so the clamped value always fits.
    selection.index.clamp(0, last) as usize
}

/// A parsed gettext plural expression together with its form count.
#[derive(Clone, PartialEq, Eq)]
pub struct PluralExpr {
    nplurals: i64,
    expr: Expr,
    source: String,
}

impl PluralExpr {
    pub fn parse(header: &str) -> Result<Self, PluralExprError> {
        let mut nplurals = None;
        let mut plural = None;

        for part in header.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((name, value)) = part.split_once('=') else {
                return Err(PluralExprError::UnknownAssignment(part.to_string()));
            };
            let name = name.trim();
            if name.eq_ignore_ascii_case("nplurals") {
                let value = value.trim();
                let n = value
                    .parse::<i64>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| PluralExprError::InvalidNplurals(value.to_string()))?;
                nplurals = Some(n);
            } else if name.eq_ignore_ascii_case("plural") {
                plural = Some(Parser::new(value)?.parse()?);
            } else {
                return Err(PluralExprError::UnknownAssignment(name.to_string()));
            }
        }

        Ok(Self {
            nplurals: nplurals.ok_or(PluralExprError::MissingNplurals)?,
            expr: plural.ok_or(PluralExprError::MissingPlural)?,
            source: header.trim().to_string(),
        })
    }

    pub fn nplurals(&self) -> i64 {
        self.nplurals
    }

    pub fn select(&self, count: i64) -> PluralSelection {
        PluralSelection::new(self.nplurals, self.expr.eval(count))
    }
}

impl fmt::Debug for PluralExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PluralExpr").field(&self.source).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }

    fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Self::Or => i64::from(lhs != 0 || rhs != 0),
            Self::And => i64::from(lhs != 0 && rhs != 0),
            Self::Eq => i64::from(lhs == rhs),
            Self::Ne => i64::from(lhs != rhs),
            Self::Lt => i64::from(lhs < rhs),
            Self::Le => i64::from(lhs <= rhs),
            Self::Gt => i64::from(lhs > rhs),
            Self::Ge => i64::from(lhs >= rhs),
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mul => lhs.wrapping_mul(rhs),
            Self::Div => lhs.checked_div(rhs).unwrap_or(0),
            Self::Rem => lhs.checked_rem(rhs).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    N,
    Lit(i64),
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, n: i64) -> i64 {
        match self {
            Self::N => n,
            Self::Lit(v) => *v,
            Self::Not(e) => i64::from(e.eval(n) == 0),
            Self::Neg(e) => e.eval(n).wrapping_neg(),
            // Short-circuit like C.
            Self::Binary(BinOp::And, lhs, rhs) => i64::from(lhs.eval(n) != 0 && rhs.eval(n) != 0),
            Self::Binary(BinOp::Or, lhs, rhs) => i64::from(lhs.eval(n) != 0 || rhs.eval(n) != 0),
            Self::Binary(op, lhs, rhs) => op.apply(lhs.eval(n), rhs.eval(n)),
            Self::Cond(cond, then, otherwise) => {
                if cond.eval(n) != 0 {
                    then.eval(n)
                } else {
                    otherwise.eval(n)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    N,
    Num(i64),
    Op(BinOp),
    Not,
    LParen,
    RParen,
    Question,
    Colon,
}

fn syntax(offset: usize, msg: impl Into<String>) -> PluralExprError {
    PluralExprError::Syntax {
        offset,
        msg: msg.into(),
    }
}

fn tokenize(src: &str) -> Result<Vec<(Token, usize)>, PluralExprError> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();
        let (token, len) = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'0'..=b'9' => {
                let end = bytes[i..]
                    .iter()
                    .position(|b| !b.is_ascii_digit())
                    .map_or(bytes.len(), |p| i + p);
                let value = src[i..end]
                    .parse::<i64>()
                    .map_err(|_| syntax(start, "integer literal out of range"))?;
                (Token::Num(value), end - i)
            }
            b'n' => (Token::N, 1),
            b'(' => (Token::LParen, 1),
            b')' => (Token::RParen, 1),
            b'?' => (Token::Question, 1),
            b':' => (Token::Colon, 1),
            b'+' => (Token::Op(BinOp::Add), 1),
            b'-' => (Token::Op(BinOp::Sub), 1),
            b'*' => (Token::Op(BinOp::Mul), 1),
            b'/' => (Token::Op(BinOp::Div), 1),
            b'%' => (Token::Op(BinOp::Rem), 1),
            b'=' if next == Some(b'=') => (Token::Op(BinOp::Eq), 2),
            b'!' if next == Some(b'=') => (Token::Op(BinOp::Ne), 2),
            b'!' => (Token::Not, 1),
            b'<' if next == Some(b'=') => (Token::Op(BinOp::Le), 2),
            b'<' => (Token::Op(BinOp::Lt), 1),
            b'>' if next == Some(b'=') => (Token::Op(BinOp::Ge), 2),
            b'>' => (Token::Op(BinOp::Gt), 1),
            b'&' if next == Some(b'&') => (Token::Op(BinOp::And), 2),
            b'|' if next == Some(b'|') => (Token::Op(BinOp::Or), 2),
            _ => {
                let ch = src[i..].chars().next().unwrap_or('?');
                return Err(syntax(start, format!("unexpected character `{ch}`")));
            }
        };
        out.push((token, start));
        i += len;
    }

    Ok(out)
}

/// Precedence-climbing parser over C's conditional / logical / arithmetic
/// operators.
struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn new(src: &str) -> Result<Self, PluralExprError> {
        Ok(Self {
            tokens: tokenize(src)?,
            pos: 0,
            end: src.len(),
            depth: 0,
        })
    }

    fn parse(mut self) -> Result<Expr, PluralExprError> {
        if self.tokens.is_empty() {
            return Err(syntax(0, "empty expression"));
        }
        let expr = self.conditional()?;
        if let Some(&(_, offset)) = self.tokens.get(self.pos) {
            return Err(syntax(offset, "unexpected trailing input"));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(_, o)| *o)
    }

    fn expect(&mut self, want: Token, what: &str) -> Result<(), PluralExprError> {
        if self.peek() == Some(want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(syntax(self.offset(), format!("expected {what}")))
        }
    }

    fn enter(&mut self) -> Result<(), PluralExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(syntax(self.offset(), "expression nested too deeply"));
        }
        Ok(())
    }

    fn conditional(&mut self) -> Result<Expr, PluralExprError> {
        self.enter()?;
        let cond = self.binary(1)?;
        let expr = if self.peek() == Some(Token::Question) {
            self.pos += 1;
            let then = self.conditional()?;
            self.expect(Token::Colon, "`:`")?;
            let otherwise = self.conditional()?;
            Expr::Cond(Box::new(cond), Box::new(then), Box::new(otherwise))
        } else {
            cond
        };
        self.depth -= 1;
        Ok(expr)
    }

    /// Every operator folded into `lhs` nests the tree one level deeper, so
    /// it counts against the depth budget like a parenthesis does.
    fn binary(&mut self, min_prec: u8) -> Result<Expr, PluralExprError> {
        let mut lhs = self.unary()?;
        let mut chained = 0;
        while let Some(Token::Op(op)) = self.peek() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.enter()?;
            chained += 1;
            self.pos += 1;
            let rhs = self.binary(prec + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, PluralExprError> {
        match self.peek() {
            Some(Token::Not) => {
                self.pos += 1;
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(Expr::Not(Box::new(inner)))
            }
            Some(Token::Op(BinOp::Sub)) => {
                self.pos += 1;
                self.enter()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, PluralExprError> {
        let offset = self.offset();
        match self.peek() {
            Some(Token::N) => {
                self.pos += 1;
                Ok(Expr::N)
            }
            Some(Token::Num(v)) => {
                self.pos += 1;
                Ok(Expr::Lit(v))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.conditional()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            Some(_) => Err(syntax(offset, "expected `n`, a number or `(`")),
            None => Err(syntax(offset, "unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn indices(header: &str, counts: &[i64]) -> Vec<usize> {
        let rule = PluralRule::parse(header).unwrap();
        counts
            .iter()
            .map(|&n| resolve_index(Some(&rule), n))
            .collect()
    }

    #[test]
    fn binary_fallback_without_rule() {
        assert_eq!(resolve_index(None, 1), 0);
        assert_eq!(resolve_index(None, 0), 1);
        assert_eq!(resolve_index(None, 2), 1);
        assert_eq!(resolve_index(None, -1), 1);
        assert_eq!(resolve_index(None, i64::MIN), 1);
    }

    #[test]
    fn clamps_out_of_range_indices() {
        let low = PluralRule::custom(|_| PluralSelection::new(3, -5));
        let high = PluralRule::custom(|_| PluralSelection::new(3, 99));
        assert_eq!(resolve_index(Some(&low), 7), 0);
        assert_eq!(resolve_index(Some(&high), 7), 2);
    }

    #[test]
    fn non_positive_form_count_acts_like_one_form() {
        let rule = PluralRule::custom(|n| PluralSelection::new(0, n));
        assert_eq!(resolve_index(Some(&rule), 5), 0);
        assert_eq!(resolve_index(Some(&rule), -5), 0);
    }

    #[test]
    fn bool_indices_coerce() {
        let rule = PluralRule::custom(|n| PluralSelection::new(2, n != 1));
        assert_eq!(resolve_index(Some(&rule), 1), 0);
        assert_eq!(resolve_index(Some(&rule), 4), 1);
    }

    #[test]
    fn germanic_rule() {
        assert_eq!(
            indices("nplurals=2; plural=(n != 1);", &[0, 1, 2, 5]),
            vec![1, 0, 1, 1]
        );
    }

    #[test]
    fn french_rule() {
        assert_eq!(
            indices("nplurals=2; plural=(n > 1);", &[0, 1, 2]),
            vec![0, 0, 1]
        );
    }

    #[test]
    fn czech_rule_with_nested_ternary() {
        assert_eq!(
            indices(
                "nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;",
                &[1, 2, 4, 5, 0]
            ),
            vec![0, 1, 1, 2, 2]
        );
    }

    #[test]
    fn russian_rule() {
        let header = "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : \
                      n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);";
        assert_eq!(
            indices(header, &[1, 2, 5, 11, 12, 21, 22, 25, 111]),
            vec![0, 1, 2, 2, 2, 0, 1, 2, 2]
        );
    }

    #[test]
    fn single_form_rule() {
        assert_eq!(indices("nplurals=1; plural=0;", &[0, 1, 99]), vec![0, 0, 0]);
    }

    #[test]
    fn buggy_rule_is_clamped() {
        assert_eq!(
            indices("nplurals=1; plural=n==1 ? -1 : 2", &[1, 2, 7]),
            vec![0, 0, 0]
        );
    }

    #[test]
    fn precedence_follows_c() {
        let rule = PluralExpr::parse("nplurals=100; plural=1 + 2 * 3 - 4 % 3").unwrap();
        assert_eq!(rule.select(0).index, 6);
        let rule = PluralExpr::parse("nplurals=2; plural=!n").unwrap();
        assert_eq!(rule.select(0).index, 1);
        assert_eq!(rule.select(3).index, 0);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let rule = PluralExpr::parse("nplurals=3; plural=10 / n + 5 % n").unwrap();
        assert_eq!(rule.select(0).index, 0);
        assert_eq!(rule.select(2).index, 6);
    }

    #[test]
    fn assignment_order_and_case_are_flexible() {
        let rule = PluralExpr::parse(" plural = n != 1 ; NPLURALS = 2 ").unwrap();
        assert_eq!(rule.nplurals(), 2);
        assert_eq!(rule.select(1).index, 0);
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(
            PluralExpr::parse("plural=n != 1").unwrap_err(),
            PluralExprError::MissingNplurals
        );
        assert_eq!(
            PluralExpr::parse("nplurals=2").unwrap_err(),
            PluralExprError::MissingPlural
        );
        assert_eq!(
            PluralExpr::parse("nplurals=0; plural=0").unwrap_err(),
            PluralExprError::InvalidNplurals("0".to_string())
        );
        assert!(matches!(
            PluralExpr::parse("nplurals=2; plural=(n != 1"),
            Err(PluralExprError::Syntax { .. })
        ));
        assert!(matches!(
            PluralExpr::parse("nplurals=2; plural=n & 1"),
            Err(PluralExprError::Syntax { offset: 2, .. })
        ));
        assert!(matches!(
            PluralExpr::parse("nplurals=2; plural=n 1"),
            Err(PluralExprError::Syntax { .. })
        ));
        assert!(matches!(
            PluralExpr::parse("nplurals=2; foo=1; plural=0"),
            Err(PluralExprError::UnknownAssignment(_))
        ));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let header = format!("nplurals=2; plural={}n{}", "(".repeat(500), ")".repeat(500));
        assert!(matches!(
            PluralExpr::parse(&header),
            Err(PluralExprError::Syntax { .. })
        ));
    }

    #[test]
    fn long_operator_chains_are_rejected() {
        for op in ["+n", "==n", "&&n", "%2"] {
            let header = format!("nplurals=2; plural=n{}", op.repeat(100_000));
            assert!(
                matches!(
                    PluralExpr::parse(&header),
                    Err(PluralExprError::Syntax { .. })
                ),
                "chain of `{op}` was accepted"
            );
        }
    }

    #[test]
    fn short_operator_chains_still_parse() {
        let header = format!("nplurals=50; plural=n{}", "+1".repeat(40));
        let rule = PluralExpr::parse(&header).unwrap();
        assert_eq!(rule.select(2).index, 42);
    }
}
