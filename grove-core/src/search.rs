//! Name search over the whole tree, hidden nodes included.

use serde::Serialize;

use crate::model::{NodeId, TreeModel};

/// Shorter queries match too much to be useful and return nothing.
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: NodeId,
    pub name: String,
    /// Root-first names down to the hit.
    pub ancestry: Vec<String>,
    /// True when some ancestor is collapsed; navigating will expand it.
    pub hidden: bool,
}

/// Case-insensitive substring match on node names, in pre-order.
pub fn search(model: &TreeModel, query: &str) -> Vec<SearchHit> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    model
        .flatten()
        .into_iter()
        .filter(|&nid| model.node(nid).name.to_lowercase().contains(&needle))
        .take(MAX_RESULTS)
        .map(|nid| SearchHit {
            id: nid,
            name: model.node(nid).name.clone(),
            ancestry: model.ancestry(nid),
            hidden: !model.is_visible(nid),
        })
        .collect()
}
