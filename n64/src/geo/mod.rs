//! GeoNode render graph
//!
//! A model is a tree of [`GeoNode`]s. Nodes may bind a bone, whose matrix
//! then applies to the node and everything below it, and may carry a
//! [`Selector`] that filters which children are drawn.

mod blink;
mod selector;

pub use blink::{Blink, BlinkParams, BlinkPhase};
pub use selector::{Selector, SelectorRule, SelectorState};

use glam::Mat4;

/// Opaque handle of a host draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawCallId(pub u32);

/// Receives draws from the walkers
pub trait DrawSink {
    fn draw(&mut self, draw: DrawCallId, matrix: &Mat4);

    /// Bone palette for the skinned draws that follow
    fn bone_palette(&mut self, _palette: &[Mat4]) {}
}

/// Collects draws into a list
impl DrawSink for Vec<(DrawCallId, Mat4)> {
    fn draw(&mut self, draw: DrawCallId, matrix: &Mat4) {
        self.push((draw, *matrix));
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoNode {
    /// Bone whose matrix applies from this node down
    pub bone: Option<usize>,
    pub selector: Option<Selector>,
    pub draws: Vec<DrawCallId>,
    pub children: Vec<GeoNode>,
}

impl GeoNode {
    pub fn leaf(draws: Vec<DrawCallId>) -> Self {
        Self {
            draws,
            ..Self::default()
        }
    }

    pub fn with_bone(mut self, bone: usize) -> Self {
        self.bone = Some(bone);
        self
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_children(mut self, children: Vec<GeoNode>) -> Self {
        self.children = children;
        self
    }
}

/// Submit every visible draw under `root`
///
/// Each draw gets `model * bones[b]` for the nearest bone `b` at or above its
/// node, or `model` alone when no ancestor binds a bone.
pub fn walk(
    root: &GeoNode,
    bones: &[Mat4],
    model: &Mat4,
    selectors: &SelectorState,
    sink: &mut (impl DrawSink + ?Sized),
) {
    walk_node(root, bones, *model, model, selectors, sink);
}

fn walk_node(
    node: &GeoNode,
    bones: &[Mat4],
    inherited: Mat4,
    model: &Mat4,
    selectors: &SelectorState,
    sink: &mut (impl DrawSink + ?Sized),
) {
    if node.selector.is_some_and(|s| !selectors.subtree_visible(s)) {
        return;
    }

    let matrix = match node.bone {
        Some(bone) => match bones.get(bone) {
            Some(bone_matrix) => *model * *bone_matrix,
            None => {
                tracing::debug!("geo node bone {} out of range ({} bones)", bone, bones.len());
                inherited
            }
        },
        None => inherited,
    };

    for &draw in &node.draws {
        sink.draw(draw, &matrix);
    }

    for (i, child) in node.children.iter().enumerate() {
        if node.selector.is_some_and(|s| !selectors.child_visible(s, i)) {
            continue;
        }
        walk_node(child, bones, matrix, model, selectors, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn ids(draws: &[(DrawCallId, Mat4)]) -> Vec<u32> {
        draws.iter().map(|(d, _)| d.0).collect()
    }

    /// Body (bone 0) with a head (bone 1) whose selector picks one of three faces
    fn model() -> GeoNode {
        let faces = (10..13).map(|d| GeoNode::leaf(vec![DrawCallId(d)])).collect();
        let head = GeoNode::leaf(vec![DrawCallId(2)])
            .with_bone(1)
            .with_children(vec![GeoNode::default().with_selector(Selector::child(0)).with_children(faces)]);
        GeoNode::leaf(vec![DrawCallId(1)])
            .with_bone(0)
            .with_children(vec![head])
    }

    fn bones() -> Vec<Mat4> {
        vec![
            Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
            Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        ]
    }

    #[test]
    fn test_unset_selector_draws_all_children() {
        let mut out = Vec::new();
        walk(&model(), &bones(), &Mat4::IDENTITY, &SelectorState::new(), &mut out);
        assert_eq!(ids(&out), vec![1, 2, 10, 11, 12]);
    }

    #[test]
    fn test_selector_picks_one_face() {
        let mut selectors = SelectorState::new();
        selectors.set(0, 2);
        let mut out = Vec::new();
        walk(&model(), &bones(), &Mat4::IDENTITY, &selectors, &mut out);
        assert_eq!(ids(&out), vec![1, 2, 11]);

        selectors.set(0, 0);
        out.clear();
        walk(&model(), &bones(), &Mat4::IDENTITY, &selectors, &mut out);
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn test_draws_use_nearest_bone() {
        let model_matrix = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let mut out = Vec::new();
        walk(&model(), &bones(), &model_matrix, &SelectorState::new(), &mut out);

        let origin = |m: &Mat4| m.transform_point3(Vec3::ZERO);
        assert_eq!(origin(&out[0].1), Vec3::new(5.0, 1.0, 0.0));
        assert_eq!(origin(&out[1].1), Vec3::new(5.0, 2.0, 0.0));
        // Faces have no bone of their own and inherit the head's
        assert_eq!(origin(&out[2].1), Vec3::new(5.0, 2.0, 0.0));
    }

    #[test]
    fn test_missing_bone_inherits_parent() {
        let root = GeoNode::leaf(vec![DrawCallId(1)])
            .with_bone(0)
            .with_children(vec![GeoNode::leaf(vec![DrawCallId(2)]).with_bone(9)]);
        let mut out = Vec::new();
        walk(&root, &bones(), &Mat4::IDENTITY, &SelectorState::new(), &mut out);
        assert_eq!(out[1].1, bones()[0]);
    }
}
