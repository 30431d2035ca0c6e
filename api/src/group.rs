use std::collections::HashMap;
use std::hash::Hash;

/// Bucket `items` by a derived key.
///
/// Buckets come back in order of each key's first appearance, and items keep
/// their relative input order inside a bucket. Nothing is sorted or dropped.
pub fn group_by<T, K, I, F>(items: I, mut key_fn: F) -> Vec<(K, Vec<T>)>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let key = key_fn(&item);
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_follows_first_appearance() {
        let groups = group_by(["B1", "A1", "B2"], |s| s[..1].to_string());
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[test]
    fn buckets_keep_input_order() {
        let input = vec![(1, 'a'), (2, 'b'), (1, 'c'), (3, 'd'), (2, 'e'), (1, 'f')];
        let groups = group_by(input, |(k, _)| *k);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], (1, vec![(1, 'a'), (1, 'c'), (1, 'f')]));
        assert_eq!(groups[1], (2, vec![(2, 'b'), (2, 'e')]));
        assert_eq!(groups[2], (3, vec![(3, 'd')]));
    }

    #[test]
    fn union_of_buckets_is_the_input() {
        let input: Vec<u32> = (0..50).map(|i| (i * 7) % 13).collect();
        let groups = group_by(input.clone(), |n| n % 4);

        let mut flattened: Vec<u32> = groups.into_iter().flat_map(|(_, items)| items).collect();
        let mut expected = input;
        flattened.sort_unstable();
        expected.sort_unstable();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn empty_key_is_a_regular_bucket() {
        let groups = group_by(vec!["", "x", ""], |s| s.to_string());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "");
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        let groups = group_by(Vec::<i32>::new(), |n| *n);
        assert!(groups.is_empty());
    }
}
