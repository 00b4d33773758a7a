//! Fixtures shared by the unit tests

use crate::builder::NetworkBuilder;
use crate::graph::CoauthorNetwork;
use bibnet_common::{AuthorKey, PublicationRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) fn publication(key: &str, authors: &[&str]) -> PublicationRecord {
    PublicationRecord {
        key: key.to_string(),
        title: format!("Title of {}", key),
        year: "2020".to_string(),
        kind: "article".to_string(),
        author_keys: authors.iter().map(|&a| AuthorKey::from(a)).collect(),
    }
}

/// Network with one publication per author list, keyed `p0`, `p1`, ...
pub(crate) fn network_from(author_lists: &[&[&str]]) -> CoauthorNetwork {
    let mut builder = NetworkBuilder::new();
    for (i, authors) in author_lists.iter().enumerate() {
        builder.add_publication(publication(&format!("p{}", i), authors));
    }
    builder.build()
}

/// Publications with 1 to 4 distinct authors drawn from a pool
pub(crate) fn random_publications(seed: u64, count: usize, pool: usize) -> Vec<PublicationRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let size = rng.gen_range(1..=4usize.min(pool));
            let names: Vec<String> = rand::seq::index::sample(&mut rng, pool, size)
                .into_iter()
                .map(|a| format!("Author {:02}", a))
                .collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            publication(&format!("r{}", i), &refs)
        })
        .collect()
}

/// G(n, p) random graph; every node also has a solo publication so none is missing
pub(crate) fn random_network(seed: u64, n: usize, p: f64) -> CoauthorNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (0..n).map(|i| format!("N{:03}", i)).collect();

    let mut builder = NetworkBuilder::new();
    for name in &names {
        builder.add_publication(publication(&format!("solo-{}", name), &[name.as_str()]));
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen_bool(p) {
                builder.add_publication(publication(
                    &format!("{}-{}", i, j),
                    &[names[i].as_str(), names[j].as_str()],
                ));
            }
        }
    }
    builder.build()
}
