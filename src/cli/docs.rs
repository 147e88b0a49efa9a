//! Documentation content for metarule CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Conditions,
    Actions,
    Collections,
    Types,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "paths" => Some(Self::Syntax),
            "conditions" | "condition" | "where" => Some(Self::Conditions),
            "actions" | "action" => Some(Self::Actions),
            "collections" | "collection" | "arrays" | "for" => Some(Self::Collections),
            "types" | "type" | "values" => Some(Self::Types),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"METARULE DOCUMENTATION

A rule is a condition and an action. The condition selects documents; the
action edits their metadata (YAML front matter).

  condition:  status = "draft" AND NOT HAS reviewed
  action:     SET status "published", reviewed TODAY

DOCUMENTATION CATEGORIES

  syntax        Paths, literals, quoting, and @ (the current element)
  conditions    Comparisons, HAS/EXISTS, CONTAINS, IN, ANY, AND/OR/NOT
  actions       SET, DELETE, RENAME, INCREMENT, DECREMENT
  collections   FOR path ... array and object operations
  types         Values, coercion, and ordering rules

QUICK REFERENCE

  field.sub.0           Path (dotted, integer segments index arrays)
  "due date"            Quoted path segment
  @                     Current element (inside WHERE)
  = != < <= > >=        Comparison
  HAS f / NOT HAS f     Field present / absent
  ANY list WHERE c      Some element matches c
  FOR list VERB ...     Collection operation

Run 'metarule doc <category>' for detailed documentation.
Run 'metarule onboard' for a short tutorial.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Conditions) => Ok(CONDITIONS_DOC),
        Some(DocCategory::Actions) => Ok(ACTIONS_DOC),
        Some(DocCategory::Collections) => Ok(COLLECTIONS_DOC),
        Some(DocCategory::Types) => Ok(TYPES_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Paths and Literals

PATHS
  status
  metadata.reviewed
  items.0.name
  "due date"
    Dotted segments. A segment is an identifier (letters, digits, _ and -),
    a quoted string, or an integer. Integers index arrays; negative values
    count from the end (items.-1 is the last element).

    Keywords may appear as keys after a dot: meta.END

CURRENT ELEMENT
  @
  @.name
    Inside ANY ... WHERE and FOR ... WHERE, paths are relative to the array
    element being tested. @ names the element itself, which is how arrays
    of plain strings are filtered:

      FOR tags WHERE @ = "urgent" MOVE TO START

LITERALS
  "text" or 'text'      Strings, escapes: \n \t \r \" \' \\
  42  -3  1.5  2e3      Numbers
  true false null       Booleans and null (lower case)
  ["a", "b"]            Arrays
  {key: "v", n: 1}      Objects (keys are identifiers or strings)
  NOW                   Current local date-time, 2024-05-01T09:30:00
  TODAY                 Current local date, 2024-05-01

KEYWORDS
  Keywords are upper case and case-sensitive. `set` is a field name,
  `SET` is the verb.

ERRORS
  Syntax errors carry the character offset where parsing stopped and,
  where possible, an example of the correct form:

    status =
    => Expected a value after 'status =' (e.g. status = "draft"), found end of input at offset 8
"#;

const CONDITIONS_DOC: &str = r#"CONDITIONS

COMPARISON
  path = value      (== also accepted)
  path != value
  path < value   path <= value   path > value   path >= value

    When both sides look numeric ("10" and 9) they compare as numbers.
    Two strings order lexicographically. Any other ordering is false.
    A missing field makes every comparison false, including !=.

PRESENCE
  HAS path          path EXISTS
  NOT HAS path      path NOT EXISTS

    A field holding null is present.

TRUTHINESS
  path
    A bare path is true when the value is present and not false, 0,
    "", null, [] or {}.

CONTAINS
  tags CONTAINS "work"
  title CONTAINS "draft"
  tags NOT CONTAINS "archived"

    On an array: some element equals the value.
    On a string: substring test.

IN
  status IN ["draft", "review"]
  status NOT IN ["done"]

ANY
  ANY countsLog WHERE mantra = "Brave New World" AND count > 3
  ANY tags WHERE @ = "urgent"

    True when at least one element of the array satisfies the inner
    condition. Inner paths are relative to the element. The inner
    condition extends to the end of the enclosing group; use
    parentheses to combine with further conditions:

      (ANY tasks WHERE done = false) AND status = "active"

LOGIC
  NOT a          a AND b          a OR b          (a)

    Precedence from tightest: NOT, AND, OR.
"#;

const ACTIONS_DOC: &str = r#"ACTIONS

One action uses one verb. List several fields with commas.

SET
  SET status "published"
  SET status = "published", reviewed TODAY
  SET metadata.owner "sam"
    Missing parents are created. Writing through a scalar is an error.

DELETE
  DELETE draft, wip
    Deleting a missing field is a warning.

RENAME
  RENAME author TO creator
  RENAME meta.old TO meta.new
    Both paths start at the document root. A rename within one object
    keeps the key's position. A missing source is a warning; an existing
    target with a different value is an error.

INCREMENT / DECREMENT
  INCREMENT views
  INCREMENT views 5, shares
  DECREMENT stock 2.5
    The default amount is 1. A missing field starts from 0. Numeric
    strings are accepted; other values are an error.

RESULTS
  Every run reports:
    success   all operations ran
    warning   some operations had no effect (missing fields, no matches)
    error     an operation failed; later operations did not run and
              earlier ones are kept
    skipped   the condition did not match (CLI only)
"#;

const COLLECTIONS_DOC: &str = r#"COLLECTIONS - FOR path ...

ARRAYS
  FOR tags APPEND "reviewed"
  FOR tags PREPEND "pinned"
  FOR tags INSERT "urgent" AT 1
      AT 0 prepends, AT -1 appends, AT -2 inserts before the last element.

  FOR tags REMOVE "draft"                 first equal element
  FOR tags REMOVE_ALL "draft"             every equal element
  FOR tags REMOVE_ALL ["draft", "wip"]
  FOR tasks WHERE done = true REMOVE      every matching element

  FOR tags SORT
  FOR tasks SORT BY priority DESC
      Stable. Missing sort fields come first in ascending order.
      Mixed types: null < numbers < strings < booleans < arrays < objects.

  FOR tasks MOVE FROM 0 TO -1
  FOR tags WHERE @ = "urgent" MOVE TO START
  FOR tasks WHERE done = true MOVE TO END
  FOR tasks WHERE id = 3 MOVE TO AFTER id = 1
  FOR tasks WHERE id = 3 MOVE TO BEFORE id = 1

  FOR tags DEDUPLICATE

  FOR countsLog WHERE mantra = "Brave New World" SET unit "Meditations", verified true
      Sets fields on every matching element. SET @ value replaces the
      element. FOR ... SET requires WHERE.

  APPEND, PREPEND and INSERT create a missing array. Other verbs warn
  when the array is missing. A target that is not an array is an error.

OBJECTS
  FOR metadata MERGE {reviewed: true, owner: {name: "sam"}}
      Deep merge: nested objects merge key by key, other values replace.

  FOR metadata MERGE_OVERWRITE {owner: {name: "sam"}}
      Shallow: top-level keys replace existing values wholesale.

WHERE
  Only SET, REMOVE and MOVE TO accept WHERE, and it must come before
  the verb:

    FOR tasks WHERE done = true REMOVE
"#;

const TYPES_DOC: &str = r#"TYPES

VALUES
  null, boolean, number, string, array, object

  Numbers are 64-bit floats. Whole numbers print without a fraction.
  Object keys keep the order they had in the document.

COERCION
  Comparisons, IN and INCREMENT treat strings holding a decimal number
  ("42", "-1.5", "2e3") as numbers. Nothing else is coerced.

EQUALITY
  Structural: arrays compare element-wise, objects compare key by key
  regardless of order.

DATES
  NOW and TODAY produce strings, so date fields compare
  lexicographically:

    due < TODAY
    SET reviewed TODAY
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_resolve_with_aliases() {
        assert_eq!(DocCategory::from_str("Collections"), Some(DocCategory::Collections));
        assert_eq!(DocCategory::from_str("for"), Some(DocCategory::Collections));
        assert!(get_doc_category("conditions").unwrap().contains("ANY"));
        assert!(matches!(get_doc_category("queries"), Err(CliError::UnknownCategory(_))));
    }
}
