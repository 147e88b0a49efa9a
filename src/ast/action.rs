use crate::ast::{Condition, Literal, SortOrder};
use crate::path::Path;

/// Parsed action: operations executed in source order against one working copy.
///
/// # Examples
/// ```text
/// SET status "published", reviewed true
/// FOR tags SORT DESC
/// FOR countsLog WHERE mantra = "Brave New World" SET unit "Meditations"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub operations: Vec<Operation>,
}

/// A single mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Write a value, creating missing parents
    ///
    /// # Example
    /// ```text
    /// SET status "published"
    /// ```
    Set { path: Path, value: Literal },

    /// Remove a field
    ///
    /// # Example
    /// ```text
    /// DELETE draft
    /// ```
    Delete { path: Path },

    /// Move a field to a new path
    ///
    /// # Example
    /// ```text
    /// RENAME author TO creator
    /// ```
    Rename { from: Path, to: Path },

    /// Add to a number (default 1)
    Increment { path: Path, amount: Option<f64> },

    /// Subtract from a number (default 1)
    Decrement { path: Path, amount: Option<f64> },

    /// Array or object operation introduced by `FOR path`
    Collection(CollectionOp),
}

/// `FOR target [WHERE filter] verb`
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionOp {
    pub target: Path,
    pub filter: Option<Condition>,
    pub verb: CollectionVerb,
}

/// Verb of a collection operation together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionVerb {
    /// `APPEND value`
    Append(Literal),

    /// `PREPEND value`
    Prepend(Literal),

    /// `INSERT value AT index`
    Insert { value: Literal, at: i64 },

    /// `REMOVE_ALL value` or `REMOVE_ALL [v1, v2]`
    RemoveAll(Literal),

    /// `REMOVE value` (first occurrence) or `WHERE cond REMOVE` (every match)
    Remove(Option<Literal>),

    /// `SORT [BY path] [ASC|DESC]`
    Sort { by: Option<Path>, order: SortOrder },

    /// `MOVE FROM i TO j`
    MoveIndex { from: i64, to: i64 },

    /// `WHERE cond MOVE TO destination`
    MoveWhere(MoveDestination),

    /// `DEDUPLICATE`
    Deduplicate,

    /// `MERGE value` (deep) or `MERGE_OVERWRITE value` (shallow)
    Merge { value: Literal, deep: bool },

    /// `WHERE cond SET field value, ...` applied to every matching element
    Update(Vec<(Path, Literal)>),
}

impl CollectionVerb {
    /// Keyword spelling used in messages
    pub fn name(&self) -> &'static str {
        match self {
            CollectionVerb::Append(_) => "APPEND",
            CollectionVerb::Prepend(_) => "PREPEND",
            CollectionVerb::Insert { .. } => "INSERT",
            CollectionVerb::RemoveAll(_) => "REMOVE_ALL",
            CollectionVerb::Remove(_) => "REMOVE",
            CollectionVerb::Sort { .. } => "SORT",
            CollectionVerb::MoveIndex { .. } | CollectionVerb::MoveWhere(_) => "MOVE",
            CollectionVerb::Deduplicate => "DEDUPLICATE",
            CollectionVerb::Merge { deep: true, .. } => "MERGE",
            CollectionVerb::Merge { deep: false, .. } => "MERGE_OVERWRITE",
            CollectionVerb::Update(_) => "SET",
        }
    }
}

/// Where `MOVE TO` places the extracted block.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveDestination {
    Start,
    End,
    /// After the first remaining element matching the anchor condition
    After(Condition),
    /// Before the first remaining element matching the anchor condition
    Before(Condition),
}
