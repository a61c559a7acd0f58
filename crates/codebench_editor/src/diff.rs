//! Char-level diff runs between two texts.

use similar::{Algorithm, DiffTag, TextDiff};

/// One maximal span of a diff, in old-to-new order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffRun {
    Equal(String),
    Insert(String),
    Delete(String),
}

impl DiffRun {
    pub fn text(&self) -> &str {
        match self {
            Self::Equal(text) | Self::Insert(text) | Self::Delete(text) => text,
        }
    }

    fn text_mut(&mut self) -> &mut String {
        match self {
            Self::Equal(text) | Self::Insert(text) | Self::Delete(text) => text,
        }
    }

    /// Length in chars, the unit the editor state indexes by.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }
}

fn push_run(runs: &mut Vec<DiffRun>, run: DiffRun) {
    if run.text().is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if std::mem::discriminant(last) == std::mem::discriminant(&run) {
            last.text_mut().push_str(run.text());
            return;
        }
    }
    runs.push(run);
}

/// Diff `old` against `new` char by char (Myers / LCS).
///
/// Replacements are emitted as a delete followed by an insert, and adjacent
/// runs of the same kind are merged.
pub fn diff_runs(old: &str, new: &str) -> Vec<DiffRun> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(old, new);
    let old_slices = diff.old_slices();
    let new_slices = diff.new_slices();

    let mut runs = Vec::new();
    for op in diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => push_run(&mut runs, DiffRun::Equal(old_slices[old_range].concat())),
            DiffTag::Delete => {
                push_run(&mut runs, DiffRun::Delete(old_slices[old_range].concat()))
            }
            DiffTag::Insert => {
                push_run(&mut runs, DiffRun::Insert(new_slices[new_range].concat()))
            }
            DiffTag::Replace => {
                push_run(&mut runs, DiffRun::Delete(old_slices[old_range].concat()));
                push_run(&mut runs, DiffRun::Insert(new_slices[new_range].concat()));
            }
        }
    }
    runs
}

/// Rebuild the old side (equal + deleted text).
pub fn old_text(runs: &[DiffRun]) -> String {
    runs.iter()
        .filter(|run| !matches!(run, DiffRun::Insert(_)))
        .map(DiffRun::text)
        .collect()
}

/// Rebuild the new side (equal + inserted text).
pub fn new_text(runs: &[DiffRun]) -> String {
    runs.iter()
        .filter(|run| !matches!(run, DiffRun::Delete(_)))
        .map(DiffRun::text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_reconstruct_both_sides() {
        let cases = [
            ("", ""),
            ("", "abc"),
            ("abc", ""),
            ("abc\ndef\n", "abcX\ndef\n"),
            ("fn main(){\nlet x=1;}\n", "fn main() {\n    let x = 1;\n}\n"),
            ("héllo wörld", "hello world!"),
        ];
        for (old, new) in cases {
            let runs = diff_runs(old, new);
            assert_eq!(old_text(&runs), old, "old side of {old:?} -> {new:?}");
            assert_eq!(new_text(&runs), new, "new side of {old:?} -> {new:?}");
        }
    }

    #[test]
    fn single_insert_is_isolated() {
        let runs = diff_runs("abc\ndef\n", "abcX\ndef\n");
        assert_eq!(
            runs,
            vec![
                DiffRun::Equal("abc".to_string()),
                DiffRun::Insert("X".to_string()),
                DiffRun::Equal("\ndef\n".to_string()),
            ]
        );
    }

    #[test]
    fn identical_text_is_one_equal_run() {
        assert_eq!(diff_runs("same", "same"), vec![DiffRun::Equal("same".to_string())]);
        assert!(diff_runs("", "").is_empty());
    }

    #[test]
    fn adjacent_runs_never_share_a_tag() {
        let runs = diff_runs("aXbYc", "aZbWc");
        for pair in runs.windows(2) {
            assert_ne!(
                std::mem::discriminant(&pair[0]),
                std::mem::discriminant(&pair[1])
            );
        }
        assert_eq!(runs[1].char_len(), 1);
    }
}
