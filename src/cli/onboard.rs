//! Onboarding tutorial content for metarule CLI

/// Get the onboarding tutorial content
pub fn get_onboarding_content() -> &'static str {
    r#"WELCOME TO METARULE

metarule edits YAML metadata with rules: a condition that selects a
document and an action that changes it.

STEP 1: TEST A CONDITION
------------------------
  echo 'status: draft' | metarule eval 'status = "draft"'
  => true

STEP 2: CHANGE A FIELD
----------------------
  echo 'status: draft' | metarule apply 'SET status "published"'
  => success
     Set status: "draft" → "published"
     status: published

STEP 3: ONLY WHEN IT MATCHES
----------------------------
  echo 'status: done' | metarule apply 'SET status "published"' --condition 'status = "draft"'
  => skipped

STEP 4: WORK WITH LISTS
-----------------------
  echo 'tags: [zebra, apple, banana]' | metarule apply 'FOR tags SORT'
  => tags: [apple, banana, zebra]

  echo 'tags: [work, draft, project]' | metarule apply 'FOR tags REMOVE_ALL "draft"'

STEP 5: EDIT MATCHING ELEMENTS
------------------------------
  FOR countsLog WHERE mantra = "Brave New World" SET unit "Meditations"

  Paths after WHERE are relative to each element.

STEP 6: CHECK BEFORE RUNNING
----------------------------
  metarule check --condition 'status = '
  => Invalid condition: Expected a value after 'status =' ...

NEXT STEPS
----------
  metarule docs              List documentation categories
  metarule doc collections   All FOR operations
"#
}
