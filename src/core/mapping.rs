use std::collections::BTreeMap;

/// Cluster id → class id.
pub type ClusterMapping = BTreeMap<usize, usize>;

/// Majority vote of true labels per cluster.
///
/// For each cluster in `0..n_clusters` the labels of the samples assigned to
/// it are tallied and the most frequent one wins. Ties go to the class seen
/// first in `labels` order. Clusters with no samples get no entry.
pub fn cluster_to_class(clusters: &[usize], labels: &[usize], n_clusters: usize) -> ClusterMapping {
    let mut mapping = ClusterMapping::new();

    for cluster in 0..n_clusters {
        // (class, count) in first-seen order
        let mut tally: Vec<(usize, usize)> = Vec::new();
        for (_, &label) in clusters.iter().zip(labels).filter(|(c, _)| **c == cluster) {
            match tally.iter_mut().find(|(class, _)| *class == label) {
                Some((_, count)) => *count += 1,
                None => tally.push((label, 1)),
            }
        }

        let mut majority: Option<(usize, usize)> = None;
        for &(class, count) in &tally {
            if majority.map_or(true, |(_, best)| count > best) {
                majority = Some((class, count));
            }
        }

        match majority {
            Some((class, count)) => {
                tracing::debug!("cluster {} -> class {} ({} votes)", cluster, class, count);
                mapping.insert(cluster, class);
            }
            None => tracing::warn!("cluster {} has no training samples, leaving it unmapped", cluster),
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_per_cluster() {
        let clusters = [0, 0, 0, 1, 1, 2, 2, 2];
        let labels = [2, 2, 1, 0, 0, 1, 1, 2];

        let mapping = cluster_to_class(&clusters, &labels, 3);

        assert_eq!(mapping.get(&0), Some(&2));
        assert_eq!(mapping.get(&1), Some(&0));
        assert_eq!(mapping.get(&2), Some(&1));
    }

    #[test]
    fn test_tie_goes_to_first_seen_class() {
        let clusters = [0, 0, 0, 0];
        let labels = [2, 1, 1, 2];
        assert_eq!(cluster_to_class(&clusters, &labels, 1).get(&0), Some(&2));

        let labels = [1, 2, 2, 1];
        assert_eq!(cluster_to_class(&clusters, &labels, 1).get(&0), Some(&1));
    }

    #[test]
    fn test_empty_cluster_is_unmapped() {
        let mapping = cluster_to_class(&[0, 0, 2], &[1, 1, 0], 3);
        assert_eq!(mapping.len(), 2);
        assert!(!mapping.contains_key(&1));
    }

    #[test]
    fn test_mapping_can_be_non_identity() {
        let mapping = cluster_to_class(&[0, 1, 2], &[2, 0, 1], 3);
        assert_eq!(mapping, ClusterMapping::from([(0, 2), (1, 0), (2, 1)]));
    }
}
