use crate::ast::{CompareOp, Literal};
use crate::path::Path;

/// Boolean expression over a document.
///
/// Produced by [`parse_condition`](crate::parse_condition) and interpreted by
/// [`evaluate`](crate::evaluate). Every path inside a condition is resolved
/// against the evaluation root, which is the document itself or, inside
/// [`Condition::Any`], the array element being tested.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Comparison against a literal
    ///
    /// # Examples
    /// ```text
    /// status = "draft"
    /// priority >= 3
    /// due < TODAY
    /// ```
    Comparison {
        path: Path,
        op: CompareOp,
        value: Literal,
    },

    /// Existence check
    ///
    /// # Examples
    /// ```text
    /// HAS reviewed            // negated: false
    /// NOT HAS reviewed        // negated: true
    /// reviewed EXISTS
    /// reviewed NOT EXISTS
    /// ```
    Exists { path: Path, negated: bool },

    /// Array membership or substring test
    ///
    /// # Example
    /// ```text
    /// tags CONTAINS "work"
    /// ```
    Contains { path: Path, value: Literal },

    /// Value is one of a list
    ///
    /// # Example
    /// ```text
    /// status IN ["draft", "review"]
    /// ```
    In { path: Path, values: Vec<Literal> },

    /// Quantifier over array elements
    ///
    /// # Example
    /// ```text
    /// ANY countsLog WHERE mantra = "Brave New World"
    /// ```
    Any {
        path: Path,
        condition: Box<Condition>,
    },

    /// Logical AND (`AND`)
    And(Box<Condition>, Box<Condition>),

    /// Logical OR (`OR`)
    Or(Box<Condition>, Box<Condition>),

    /// Logical negation (`NOT`)
    Not(Box<Condition>),

    /// Bare path, true when the value is present and truthy
    ///
    /// # Example
    /// ```text
    /// published
    /// ```
    Truthy(Path),
}

impl Condition {
    pub fn and(left: Condition, right: Condition) -> Self {
        Condition::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Condition, right: Condition) -> Self {
        Condition::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }
}
