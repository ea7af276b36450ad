//! Left outer join of tract geometries with tabular records.

use std::collections::HashMap;

use tracing::debug;

use tract_common::GeoId;

/// A left row paired with at most one right row.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<L, R> {
    pub left: L,
    pub right: Option<R>,
}

impl<L, R> Joined<L, R> {
    pub fn is_matched(&self) -> bool {
        self.right.is_some()
    }
}

/// Left outer join on text keys.
///
/// Both keys go through [`GeoId::new`] before comparison. Every left row
/// appears in the output, in left order. A left row whose key occurs `n > 0`
/// times on the right appears `n` times, once per right row in right order;
/// with no match it appears once with `right: None`.
pub fn left_join<L, R, KL, KR>(left: &[L], right: &[R], left_key: KL, right_key: KR) -> Vec<Joined<L, R>>
where
    L: Clone,
    R: Clone,
    KL: Fn(&L) -> &str,
    KR: Fn(&R) -> &str,
{
    let mut index: HashMap<GeoId, Vec<usize>> = HashMap::with_capacity(right.len());
    for (i, row) in right.iter().enumerate() {
        index.entry(GeoId::new(right_key(row))).or_default().push(i);
    }

    let mut joined = Vec::with_capacity(left.len());
    let mut unmatched = 0usize;

    for row in left {
        match index.get(&GeoId::new(left_key(row))) {
            Some(matches) => {
                for &i in matches {
                    joined.push(Joined {
                        left: row.clone(),
                        right: Some(right[i].clone()),
                    });
                }
            }
            None => {
                unmatched += 1;
                joined.push(Joined {
                    left: row.clone(),
                    right: None,
                });
            }
        }
    }

    debug!(
        left = left.len(),
        right = right.len(),
        output = joined.len(),
        unmatched = unmatched,
        "Left join complete"
    );

    joined
}
