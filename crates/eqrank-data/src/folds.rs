//! Cross-validation fold index files (`indexes-1-fold-<k>.txt`).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{ensure_parent, read_file, DataError, Result};

/// Path of the index file of fold `k`.
pub fn fold_path(dir: &Path, k: usize) -> PathBuf {
    dir.join(format!("indexes-1-fold-{}.txt", k))
}

/// Shuffles `0..problem_count` with `seed` and cuts it into `folds` parts.
///
/// Every fold but the last holds `problem_count / folds` ids; the last one
/// takes the remainder.
///
/// # Example
///
/// ```
/// use eqrank_data::folds::split_folds;
///
/// let folds = split_folds(12, 5, 42);
/// let sizes: Vec<usize> = folds.iter().map(Vec::len).collect();
/// assert_eq!(sizes, vec![2, 2, 2, 2, 4]);
/// ```
pub fn split_folds(problem_count: usize, folds: usize, seed: u64) -> Vec<Vec<usize>> {
    let folds = folds.max(1);
    let mut ids: Vec<usize> = (0..problem_count).collect();
    ids.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let size = problem_count / folds;
    let mut out: Vec<Vec<usize>> = ids[..size * (folds - 1)]
        .chunks(size.max(1))
        .map(<[usize]>::to_vec)
        .collect();
    out.resize(folds - 1, Vec::new());
    out.push(ids[size * (folds - 1)..].to_vec());
    out
}

/// Writes one index file per fold into `dir`.
pub fn write_folds(dir: &Path, folds: &[Vec<usize>]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(folds.len());
    for (k, ids) in folds.iter().enumerate() {
        let path = fold_path(dir, k);
        ensure_parent(&path)?;
        let mut text = String::new();
        for id in ids {
            let _ = writeln!(text, "{}", id);
        }
        std::fs::write(&path, text)?;
        paths.push(path);
    }
    Ok(paths)
}

/// Reads the problem ids of fold `k`.
pub fn read_fold(dir: &Path, k: usize) -> Result<Vec<usize>> {
    let path = fold_path(dir, k);
    let text = read_file(&path)?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.trim()
                .parse::<usize>()
                .map_err(|e| DataError::MalformedFile {
                    path: path.clone(),
                    line: i + 1,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Ids of every fold except `k`, in fold order.
pub fn training_ids(dir: &Path, k: usize, fold_count: usize) -> Result<Vec<usize>> {
    let mut ids = Vec::new();
    for other in (0..fold_count).filter(|f| *f != k) {
        ids.extend(read_fold(dir, other)?);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_covers_every_id_once() {
        for (n, folds) in [(0, 5), (3, 5), (10, 5), (11, 5), (278, 5), (7, 2)] {
            let split = split_folds(n, folds, 42);
            assert_eq!(split.len(), folds);
            let mut all: Vec<usize> = split.iter().flatten().copied().collect();
            all.sort_unstable();
            assert_eq!(all, (0..n).collect::<Vec<_>>(), "n={n} folds={folds}");
        }
    }

    #[test]
    fn test_split_is_seeded() {
        assert_eq!(split_folds(50, 5, 1), split_folds(50, 5, 1));
        assert_ne!(split_folds(50, 5, 1), split_folds(50, 5, 2));
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let folds = split_folds(11, 3, 9);
        let paths = write_folds(dir.path(), &folds).unwrap();
        assert!(paths[2].ends_with("indexes-1-fold-2.txt"));
        for (k, ids) in folds.iter().enumerate() {
            assert_eq!(&read_fold(dir.path(), k).unwrap(), ids);
        }
        let train = training_ids(dir.path(), 1, 3).unwrap();
        assert_eq!(train.len(), folds[0].len() + folds[2].len());
        assert!(train.iter().all(|id| !folds[1].contains(id)));
    }
}
