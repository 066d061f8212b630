//! Per-fold result tallies (`fold<k>.json`).

use std::path::{Path, PathBuf};

use eqrank_scoring::Tally;

use crate::error::{ensure_parent, read_file, Result};

pub fn result_path(dir: &Path, fold: usize) -> PathBuf {
    dir.join(format!("fold{}.json", fold))
}

pub fn write_tally(dir: &Path, fold: usize, tally: &Tally) -> Result<PathBuf> {
    let path = result_path(dir, fold);
    ensure_parent(&path)?;
    std::fs::write(&path, serde_json::to_string_pretty(tally)?)?;
    Ok(path)
}

pub fn read_tally(dir: &Path, fold: usize) -> Result<Tally> {
    Ok(serde_json::from_str(&read_file(&result_path(dir, fold))?)?)
}

/// Sums the tallies of folds `0..fold_count`, skipping folds without a result
/// file. Returns the sum and the folds that were found.
pub fn sum_tallies(dir: &Path, fold_count: usize) -> Result<(Tally, Vec<usize>)> {
    let mut total = Tally::new();
    let mut found = Vec::new();
    for fold in 0..fold_count {
        if !result_path(dir, fold).is_file() {
            continue;
        }
        total += read_tally(dir, fold)?;
        found.push(fold);
    }
    Ok((total, found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_skips_missing_folds() {
        let dir = tempfile::tempdir().unwrap();
        let a = Tally {
            correct: 3,
            incorrect: 1,
            ..Tally::default()
        };
        let b = Tally {
            correct: 1,
            incorrect: 1,
            failed: 1,
            ..Tally::default()
        };
        write_tally(dir.path(), 0, &a).unwrap();
        write_tally(dir.path(), 2, &b).unwrap();
        assert_eq!(read_tally(dir.path(), 2).unwrap(), b);

        let (total, found) = sum_tallies(dir.path(), 5).unwrap();
        assert_eq!(found, vec![0, 2]);
        assert_eq!(total.correct, 4);
        assert_eq!(total.failed, 1);
        assert!((total.accuracy_percent() - 200.0 / 3.0).abs() < 1e-9);
    }
}
