use proptest::prelude::*;
use dupfinder::duplicates::{bucket_by_size, group_bucketed, group_pairwise};
use dupfinder::progress::percent;
use dupfinder::scanner::hasher::Hasher;
use dupfinder::scanner::FileEntry;
use std::collections::HashSet;
use std::fs;
use std::time::SystemTime;
use tempfile::TempDir;

/// Write one file per content, named so walk order equals index order.
fn write_files(dir: &TempDir, contents: &[Vec<u8>]) -> Vec<FileEntry> {
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let path = dir.path().join(format!("{:03}", i));
            fs::write(&path, content).unwrap();
            FileEntry::new(path, content.len() as u64, SystemTime::now())
        })
        .collect()
}

/// Small alphabet and lengths so collisions are common.
fn contents_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..3, 0..4), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_groups_partition_equal_contents(contents in contents_strategy()) {
        let dir = TempDir::new().unwrap();
        let files = write_files(&dir, &contents);
        let index_of = |path: &std::path::Path| files.iter().position(|f| f.path == path).unwrap();

        let (groups, errors) = group_pairwise(&files, None);
        prop_assert!(errors.is_empty());

        let mut seen = HashSet::new();
        for group in &groups {
            prop_assert!(group.len() >= 2);
            let first = index_of(&group.files[0].path);
            let mut previous = first;
            for file in &group.files {
                let idx = index_of(&file.path);
                // Disjoint, internally equal, ascending
                prop_assert!(seen.insert(idx));
                prop_assert_eq!(&contents[idx], &contents[first]);
                prop_assert!(idx >= previous);
                previous = idx;
            }
        }

        // Groups are mutually unequal
        for (a, ga) in groups.iter().enumerate() {
            for gb in &groups[a + 1..] {
                let ia = index_of(&ga.files[0].path);
                let ib = index_of(&gb.files[0].path);
                prop_assert_ne!(&contents[ia], &contents[ib]);
            }
        }

        // Every file with an equal twin is grouped
        for i in 0..contents.len() {
            let has_twin = (0..contents.len()).any(|j| j != i && contents[j] == contents[i]);
            prop_assert_eq!(has_twin, seen.contains(&i));
        }
    }

    #[test]
    fn test_bucketed_equals_pairwise(contents in contents_strategy()) {
        let dir = TempDir::new().unwrap();
        let files = write_files(&dir, &contents);

        let (pairwise, _) = group_pairwise(&files, None);
        let (bucketed, _) = group_bucketed(&files, None);

        prop_assert_eq!(pairwise, bucketed);
    }

    #[test]
    fn test_hash_determinism(content in prop::collection::vec(any::<u8>(), 0..8192)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        fs::write(&path, &content).unwrap();

        let hasher = Hasher::new();
        let hash1 = hasher.full_hash(&path).unwrap();
        let hash2 = hasher.full_hash(&path).unwrap();
        prop_assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_bucket_by_size_invariants(sizes in prop::collection::vec(0u64..20, 0..50)) {
        let entries: Vec<FileEntry> = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| FileEntry::new(format!("/f{}", i).into(), size, SystemTime::now()))
            .collect();

        let (buckets, _) = bucket_by_size(&entries);

        let mut seen = HashSet::new();
        for bucket in &buckets {
            prop_assert!(bucket.len() >= 2);
            prop_assert!(bucket.windows(2).all(|w| w[0] < w[1]));
            let size = entries[bucket[0]].size;
            for &idx in bucket {
                prop_assert_eq!(entries[idx].size, size);
                prop_assert!(seen.insert(idx));
            }
        }

        for (i, entry) in entries.iter().enumerate() {
            let shared = entries.iter().filter(|e| e.size == entry.size).count() > 1;
            prop_assert_eq!(shared, seen.contains(&i));
        }
    }

    #[test]
    fn test_percent_bounds(total in 1usize..10_000, step in 0usize..10_000) {
        let current = step % (total + 1);
        let value = percent(current, total);

        prop_assert!((0.0..=100.0).contains(&value));
        prop_assert_eq!(percent(total, total), 100.0);
    }
}
