//! Group Average Module
//! Arithmetic means of a numeric attribute partitioned by a discrete key.

use std::collections::BTreeMap;

/// Mean of a value over all records sharing a key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage {
    pub key: i64,
    pub mean: f64,
}

/// Group records by `key_fn` and average `value_fn` per group. Output
/// is sorted ascending by key regardless of input order; every key is
/// unique and every group is non-empty by construction.
pub fn group_average<T>(
    records: &[T],
    key_fn: impl Fn(&T) -> i64,
    value_fn: impl Fn(&T) -> f64,
) -> Vec<GroupAverage> {
    let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(key_fn(record)).or_insert((0.0, 0));
        entry.0 += value_fn(record);
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(key, (total, count))| GroupAverage {
            key,
            mean: total / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_per_key() {
        let records = vec![(18i64, 2.0f64), (18, 4.0), (19, 1.0)];
        let averages = group_average(&records, |r| r.0, |r| r.1);

        assert_eq!(
            averages,
            vec![
                GroupAverage { key: 18, mean: 3.0 },
                GroupAverage { key: 19, mean: 1.0 },
            ]
        );
    }

    #[test]
    fn single_element_group_keeps_its_value() {
        let records = vec![(20i64, 5.0f64)];
        let averages = group_average(&records, |r| r.0, |r| r.1);
        assert_eq!(averages, vec![GroupAverage { key: 20, mean: 5.0 }]);
    }

    #[test]
    fn keys_come_out_strictly_ascending_and_unique() {
        let records = vec![
            (6i64, 1.0f64),
            (0, 2.0),
            (14, 3.0),
            (6, 5.0),
            (2, 4.0),
            (0, 3.0),
        ];
        let averages = group_average(&records, |r| r.0, |r| r.1);

        for pair in averages.windows(2) {
            assert!(pair[0].key < pair[1].key);
        }
        assert_eq!(averages.len(), 4);
    }

    #[test]
    fn order_of_input_does_not_change_output() {
        let mut records = vec![(3i64, 1.0f64), (1, 2.0), (3, 3.0), (2, 4.0)];
        let forward = group_average(&records, |r| r.0, |r| r.1);
        records.reverse();
        let backward = group_average(&records, |r| r.0, |r| r.1);
        assert_eq!(forward, backward);
    }
}
