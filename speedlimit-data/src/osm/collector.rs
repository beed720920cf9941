//! Accumulates candidate ways across the reader passes.
//!
//! The first pass keeps ways tagged with both `highway` and `maxspeed`,
//! using inline node locations when the archive carries them. Node ids
//! still lacking a coordinate are remembered so the second pass can
//! resolve exactly those.
use std::collections::{HashMap, HashSet};

use geo::Coord;
use osmpbf::Element;
use speedlimit_core::tags::has_candidate_keys;
use speedlimit_core::{Tags, WayNode, WayRecord};

use super::OsmWayScan;

#[derive(Debug, Default)]
pub(super) struct WayCollector {
    ways_scanned: u64,
    ways: Vec<WayRecord>,
    pending: HashSet<i64>,
    locations: HashMap<i64, Coord<f64>>,
}

impl WayCollector {
    pub(super) fn process_element(&mut self, element: &Element<'_>) {
        let Element::Way(way) = element else {
            return;
        };
        self.ways_scanned += 1;
        if !has_candidate_keys(way.tags().map(|(key, _)| key)) {
            return;
        }
        let refs: Vec<i64> = way.refs().collect();
        let inline: Vec<Coord<f64>> = way
            .node_locations()
            .map(|location| Coord {
                x: location.lon(),
                y: location.lat(),
            })
            .collect();
        self.record_candidate(way.id(), collect_tags(way.tags()), &refs, &inline);
    }

    /// Keep a way that already passed the tag filter.
    ///
    /// `inline` is only trusted when it covers every reference.
    pub(super) fn record_candidate(
        &mut self,
        id: i64,
        tags: Tags,
        refs: &[i64],
        inline: &[Coord<f64>],
    ) {
        let nodes = if inline.len() == refs.len() {
            refs.iter()
                .zip(inline)
                .map(|(node_id, location)| WayNode::resolved(*node_id, *location))
                .collect()
        } else {
            self.pending.extend(refs.iter().copied());
            refs.iter().copied().map(WayNode::unresolved).collect()
        };
        self.ways.push(WayRecord::new(id, nodes, tags));
    }

    pub(super) fn resolve_element(&mut self, element: &Element<'_>) {
        match element {
            Element::Node(node) => self.resolve_node(node.id(), node.lon(), node.lat()),
            Element::DenseNode(node) => self.resolve_node(node.id(), node.lon(), node.lat()),
            Element::Way(_) | Element::Relation(_) => {}
        }
    }

    pub(super) fn resolve_node(&mut self, id: i64, lon: f64, lat: f64) {
        if self.pending.remove(&id) {
            self.locations.insert(id, Coord { x: lon, y: lat });
        }
    }

    pub(super) fn has_pending_nodes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(super) fn pending_node_count(&self) -> usize {
        self.pending.len()
    }

    pub(super) fn into_scan(self) -> OsmWayScan {
        let Self {
            ways_scanned,
            mut ways,
            pending,
            locations,
        } = self;
        if !locations.is_empty() {
            for node in ways.iter_mut().flat_map(|way| way.nodes.iter_mut()) {
                if node.location.is_none() {
                    node.location = locations.get(&node.id).copied();
                }
            }
        }
        OsmWayScan {
            ways_scanned,
            ways,
            unresolved_refs: pending.len(),
        }
    }
}

fn collect_tags<'a, T>(tags: T) -> Tags
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    tags.into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}
