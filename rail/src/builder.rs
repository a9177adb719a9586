//! Rail construction from a flat node list
//!
//! Nodes form singly linked chains through their `next` index. Every node
//! that no other node points at starts a rail; chains that are pure cycles
//! are picked up afterwards from their lowest unvisited node.

use glam::Vec3;

use crate::node::{LerpRange, RailKeyframe, RailNode, RailPayload};
use crate::path::Rail;

/// All rails of a level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RailSet {
    rails: Vec<Rail>,
}

impl RailSet {
    pub fn build(nodes: &[RailNode]) -> Self {
        Self {
            rails: build_rails(nodes),
        }
    }

    pub fn rails(&self) -> &[Rail] {
        &self.rails
    }

    pub fn get(&self, index: usize) -> Option<&Rail> {
        self.rails.get(index)
    }

    pub fn len(&self) -> usize {
        self.rails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rails.is_empty()
    }
}

/// Collected contents of one walk before finishing
#[derive(Default)]
struct RawRail {
    points: Vec<Vec3>,
    keyframes: Vec<RailKeyframe>,
    /// Point counts at each camera cut marker
    camera_cuts: Vec<usize>,
}

/// Build every rail reachable in `nodes`
pub fn build_rails(nodes: &[RailNode]) -> Vec<Rail> {
    let mut referenced = vec![false; nodes.len()];
    for node in nodes {
        if let Some(next) = node.next {
            if let Some(slot) = referenced.get_mut(next as usize) {
                *slot = true;
            }
        }
    }

    let mut visited = vec![false; nodes.len()];
    let mut rails = Vec::new();

    let starts = (0..nodes.len()).filter(|&i| !referenced[i]);
    for start in starts {
        if let Some(rail) = walk(nodes, start, &mut visited) {
            rails.push(rail);
        }
    }
    // Remaining unvisited nodes only belong to cycles
    for start in 0..nodes.len() {
        if !visited[start] {
            if let Some(rail) = walk(nodes, start, &mut visited) {
                rails.push(rail);
            }
        }
    }

    tracing::debug!("built {} rails from {} nodes", rails.len(), nodes.len());
    rails
}

fn walk(nodes: &[RailNode], start: usize, visited: &mut [bool]) -> Option<Rail> {
    let mut raw = RawRail::default();
    let mut on_path = vec![false; nodes.len()];
    let mut current = start;

    loop {
        if on_path[current] {
            close_loop(nodes, current, &mut raw);
            break;
        }
        on_path[current] = true;
        visited[current] = true;

        let node = &nodes[current];
        match node.payload {
            RailPayload::Point(p) => raw.points.push(p),
            RailPayload::Keyframe(desc) => raw.keyframes.push(RailKeyframe {
                desc,
                node: current as u16,
                dist_to_end: 0.0,
            }),
            RailPayload::CameraCut => raw.camera_cuts.push(raw.points.len()),
        }

        let Some(next) = node.next else {
            break;
        };
        if next as usize >= nodes.len() {
            tracing::warn!(
                "rail node {} references missing node {}; truncating rail",
                current,
                next
            );
            break;
        }
        current = next as usize;
    }

    if raw.points.is_empty() {
        tracing::debug!("rail starting at node {} has no points; skipped", start);
        return None;
    }
    Some(finish(raw))
}

/// Append the first point at or after the revisited node so the rail closes on itself
fn close_loop(nodes: &[RailNode], revisited: usize, raw: &mut RawRail) {
    let mut current = revisited;
    for _ in 0..nodes.len() {
        let node = &nodes[current];
        if let RailPayload::Point(p) = node.payload {
            raw.points.push(p);
            return;
        }
        match node.next {
            Some(next) if (next as usize) < nodes.len() => current = next as usize,
            _ => return,
        }
    }
}

fn finish(raw: RawRail) -> Rail {
    let RawRail {
        points,
        mut keyframes,
        camera_cuts,
    } = raw;

    keyframes.sort_by(|a, b| a.t().total_cmp(&b.t()));
    let lerps = resolve_lerps(&keyframes);

    let segments = points.len().saturating_sub(1).max(1) as f32;
    let loop_start = points
        .split_last()
        .and_then(|(last, rest)| rest.iter().position(|p| p == last))
        .map_or(1.0, |i| i as f32 / segments);

    let mut rail = Rail {
        camera_cuts: camera_cuts
            .into_iter()
            .map(|count| (count.saturating_sub(1) as f32 / segments).min(1.0))
            .collect(),
        points,
        loop_start,
        keyframes,
        lerps,
    };
    compute_distances(&mut rail);
    rail
}

fn resolve_lerps(keyframes: &[RailKeyframe]) -> Vec<LerpRange> {
    let mut lerps = Vec::new();
    for (end, kf) in keyframes.iter().enumerate() {
        let Some(pair) = kf.desc.lerp_pair else {
            continue;
        };
        match keyframes[..end].iter().position(|k| k.node == pair) {
            Some(start) => lerps.push(LerpRange { start, end }),
            None => tracing::warn!(
                "keyframe at node {} pairs with node {}, which is not an earlier keyframe; lerp skipped",
                kf.node,
                pair
            ),
        }
    }
    lerps
}

/// Integrate arc length backward from the end of the rail through each keyframe
fn compute_distances(rail: &mut Rail) {
    let mut distance = 0.0;
    let mut upper = 1.0;
    for i in (0..rail.keyframes.len()).rev() {
        let t = rail.keyframes[i].t();
        distance += rail.arc_length(t, upper);
        rail.keyframes[i].dist_to_end = distance;
        upper = t;
    }
}
