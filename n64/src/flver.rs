//! FLVER-style flat mesh lists
//!
//! Unlike the GeoNode tree, each mesh names the bones it skins against. The
//! walker builds the mesh's bone palette in model space and draws with the
//! mesh's default bone.

use glam::Mat4;

use crate::geo::{DrawCallId, DrawSink, SelectorState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlverMesh {
    /// Bone used for the mesh's rigid transform
    pub default_bone: Option<usize>,
    /// Skeleton bones referenced by the mesh's vertex bone indices
    pub bone_indices: Vec<usize>,
    pub draws: Vec<DrawCallId>,
    /// Selector state index that can hide the mesh
    pub dummy: Option<u32>,
}

fn bone_matrix(bone_world: &[Mat4], model: &Mat4, bone: usize) -> Mat4 {
    match bone_world.get(bone) {
        Some(world) => *model * *world,
        None => {
            tracing::debug!("flver bone {} out of range ({} bones)", bone, bone_world.len());
            *model
        }
    }
}

/// Submit every visible mesh
///
/// `palette` is reused between meshes to avoid reallocating.
pub fn walk_flver(
    meshes: &[FlverMesh],
    bone_world: &[Mat4],
    model: &Mat4,
    selectors: &SelectorState,
    palette: &mut Vec<Mat4>,
    sink: &mut (impl DrawSink + ?Sized),
) {
    for mesh in meshes {
        if let Some(index) = mesh.dummy {
            if selectors.get(index) == Some(0) {
                continue;
            }
        }

        palette.clear();
        palette.extend(
            mesh.bone_indices
                .iter()
                .map(|&bone| bone_matrix(bone_world, model, bone)),
        );
        sink.bone_palette(palette);

        let matrix = mesh
            .default_bone
            .map_or(*model, |bone| bone_matrix(bone_world, model, bone));
        for &draw in &mesh.draws {
            sink.draw(draw, &matrix);
        }
    }
}
