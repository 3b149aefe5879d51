use registry_model::{Entity, FacetCount, FacetDimension, FacetKeying, Facets};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Counts the values `entities` contribute to `dimension`.
///
/// Every extracted value increments its counter by one, so an entity contributing several values
/// to a multi-valued dimension is counted once per value. The entries are sorted by descending
/// count. Entries with equal counts keep the order in which their value was first encountered.
///
/// With [FacetKeying::Resource], values linked to a resource are counted per resource and the
/// entry takes the label of the first occurrence.
pub fn aggregate<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    dimension: FacetDimension,
    keying: FacetKeying,
) -> Vec<FacetCount> {
    let mut positions = FxHashMap::<String, usize>::default();
    let mut counts = Vec::<FacetCount>::new();

    for entity in entities {
        for value in dimension.extract(entity) {
            let key = value.key(keying);
            if let Some(&position) = positions.get(key) {
                counts[position].count += 1;
            } else {
                positions.insert(key.to_owned(), counts.len());
                counts.push(FacetCount {
                    label: value.label.clone(),
                    value: key.to_owned(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Computes the facets of all known dimensions over `entities`.
pub fn aggregate_all(entities: &[Arc<Entity>], keying: FacetKeying) -> Facets {
    FacetDimension::ALL
        .into_iter()
        .map(|dimension| {
            let counts = aggregate(entities.iter().map(|entity| &**entity), dimension, keying);
            (dimension, counts)
        })
        .collect()
}
