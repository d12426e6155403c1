use super::grid::{CellState, Coord, Layout};
use crate::game_logic::errors::{MazeError, MazeResult};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy_rapier3d::prelude::*;

/// Index channels of the maze geometry. The two wall channels alternate by
/// the parity of the wall cell's coordinate sum, so neighboring faces along a
/// wall run never share a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialGroup {
    WallEven,
    WallOdd,
    Floor,
}

impl MaterialGroup {
    pub const ALL: [MaterialGroup; 3] = [
        MaterialGroup::WallEven,
        MaterialGroup::WallOdd,
        MaterialGroup::Floor,
    ];

    pub fn for_wall(coord: Coord) -> Self {
        if (coord.row + coord.col) % 2 == 0 {
            MaterialGroup::WallEven
        } else {
            MaterialGroup::WallOdd
        }
    }
}

/// Vertices plus per-channel triangle indices. Every quad owns its four
/// vertices so normals stay flat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MazeGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub floor_indices: Vec<u32>,
    pub wall_indices: [Vec<u32>; 2],
}

impl MazeGeometry {
    pub fn indices(&self, group: MaterialGroup) -> &[u32] {
        match group {
            MaterialGroup::WallEven => &self.wall_indices[0],
            MaterialGroup::WallOdd => &self.wall_indices[1],
            MaterialGroup::Floor => &self.floor_indices,
        }
    }

    fn indices_mut(&mut self, group: MaterialGroup) -> &mut Vec<u32> {
        match group {
            MaterialGroup::WallEven => &mut self.wall_indices[0],
            MaterialGroup::WallOdd => &mut self.wall_indices[1],
            MaterialGroup::Floor => &mut self.floor_indices,
        }
    }

    pub fn quad_count(&self, group: MaterialGroup) -> usize {
        self.indices(group).len() / 6
    }

    pub fn wall_quad_count(&self) -> usize {
        self.quad_count(MaterialGroup::WallEven) + self.quad_count(MaterialGroup::WallOdd)
    }

    /// All triangles across every channel, floor first.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        [MaterialGroup::Floor, MaterialGroup::WallEven, MaterialGroup::WallOdd]
            .into_iter()
            .flat_map(|group| {
                self.indices(group)
                    .chunks_exact(3)
                    .map(|tri| [tri[0], tri[1], tri[2]])
            })
            .collect()
    }

    fn push_quad(
        &mut self,
        group: MaterialGroup,
        corners: [Vec3; 4],
        normal: Vec3,
        uvs: [[f32; 2]; 4],
    ) {
        let base = self.positions.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.positions.push(corner.to_array());
            self.normals.push(normal.to_array());
            self.uvs.push(uv);
        }
        self.indices_mut(group)
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Render mesh for one channel, keeping only the vertices that channel references.
    pub fn to_mesh(&self, group: MaterialGroup) -> Mesh {
        let source = self.indices(group);
        let mut remap: Vec<Option<u32>> = vec![None; self.positions.len()];
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut uvs = Vec::new();
        let mut indices = Vec::with_capacity(source.len());

        for &index in source {
            let slot = &mut remap[index as usize];
            let local = match *slot {
                Some(local) => local,
                None => {
                    let local = positions.len() as u32;
                    positions.push(self.positions[index as usize]);
                    normals.push(self.normals[index as usize]);
                    uvs.push(self.uvs[index as usize]);
                    *slot = Some(local);
                    local
                }
            };
            indices.push(local);
        }

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }

    /// Trimesh collider over the same vertices and triangles as the render meshes.
    pub fn to_collider(&self) -> MazeResult<Collider> {
        let vertices: Vec<Vec3> = self.positions.iter().copied().map(Vec3::from).collect();
        Collider::trimesh(vertices, self.triangles()).map_err(|e| MazeError::ColliderBuildFailed {
            reason: format!("{e}"),
        })
    }
}

/// Turn a layout into floor and wall quads.
///
/// Cell (r, c) is centered at (c * pitch, 0, r * pitch). Open cells get a
/// floor quad facing up. Wall cells get one vertical quad per open
/// 4-neighbor, standing on the shared edge and facing into the open cell.
/// Wall sides that touch other walls or the outside of the grid emit nothing.
pub fn synthesize(layout: &Layout, cell_pitch: f32, wall_height: f32) -> MazeGeometry {
    assert!(cell_pitch > 0.0, "cell pitch must be positive, got {cell_pitch}");
    assert!(wall_height > 0.0, "wall height must be positive, got {wall_height}");

    let half = cell_pitch / 2.0;
    let mut geometry = MazeGeometry::default();

    for row in 0..layout.rows() {
        for col in 0..layout.cols() {
            let coord = Coord::new(row, col);
            let center = coord.world_position(cell_pitch, 0.0);

            match layout.get(coord) {
                Some(CellState::Open) => {
                    geometry.push_quad(
                        MaterialGroup::Floor,
                        [
                            center + Vec3::new(-half, 0.0, -half),
                            center + Vec3::new(-half, 0.0, half),
                            center + Vec3::new(half, 0.0, half),
                            center + Vec3::new(half, 0.0, -half),
                        ],
                        Vec3::Y,
                        [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]],
                    );
                }
                Some(CellState::Wall) => {
                    let group = MaterialGroup::for_wall(coord);
                    for (direction, neighbor) in layout.neighbors(coord) {
                        if !layout.is_open(neighbor) {
                            continue;
                        }
                        let normal = direction.world_normal();
                        let edge = center + normal * half;
                        let tangent = Vec3::Y.cross(normal) * half;
                        let up = Vec3::Y * wall_height;
                        geometry.push_quad(
                            group,
                            [edge - tangent, edge + tangent, edge + tangent + up, edge - tangent + up],
                            normal,
                            [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
                        );
                    }
                }
                None => {}
            }
        }
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::grid::generate_layout;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    const PITCH: f32 = 2.0;
    const HEIGHT: f32 = 3.0;

    fn sample_layout() -> Layout {
        generate_layout(11, 11, &mut Pcg64::seed_from_u64(11))
    }

    fn quad_bases(geometry: &MazeGeometry, group: MaterialGroup) -> Vec<usize> {
        geometry
            .indices(group)
            .chunks_exact(6)
            .map(|quad| quad[0] as usize)
            .collect()
    }

    fn world_to_cell(position: Vec3) -> Coord {
        Coord::new(
            (position.z / PITCH).round() as usize,
            (position.x / PITCH).round() as usize,
        )
    }

    #[test]
    fn test_single_room_geometry() {
        let geometry = synthesize(&Layout::single_room(), PITCH, HEIGHT);

        assert_eq!(geometry.quad_count(MaterialGroup::Floor), 1);
        assert_eq!(geometry.wall_quad_count(), 4);
        assert_eq!(geometry.positions.len(), 5 * 4);
        assert_eq!(geometry.normals.len(), geometry.positions.len());
        assert_eq!(geometry.uvs.len(), geometry.positions.len());
        // The four walls around (1,1) all have an odd coordinate sum.
        assert_eq!(geometry.quad_count(MaterialGroup::WallOdd), 4);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let layout = sample_layout();
        let first = synthesize(&layout, PITCH, HEIGHT);
        let second = synthesize(&layout, PITCH, HEIGHT);

        assert_eq!(first, second);
        let bits = |g: &MazeGeometry| -> Vec<u32> {
            g.positions.iter().flatten().map(|v| v.to_bits()).collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn test_one_floor_quad_per_open_cell() {
        let layout = sample_layout();
        let geometry = synthesize(&layout, PITCH, HEIGHT);

        assert_eq!(geometry.quad_count(MaterialGroup::Floor), layout.open_count());
        for base in quad_bases(&geometry, MaterialGroup::Floor) {
            let centroid = (0..4)
                .map(|i| Vec3::from(geometry.positions[base + i]))
                .sum::<Vec3>()
                / 4.0;
            assert_eq!(centroid.y, 0.0);
            assert!(layout.is_open(world_to_cell(centroid)));
        }
    }

    #[test]
    fn test_wall_quads_only_face_open_cells() {
        let layout = sample_layout();
        let geometry = synthesize(&layout, PITCH, HEIGHT);

        let expected_faces = layout
            .open_cells()
            .into_iter()
            .flat_map(|open| layout.neighbors(open).map(|(_, n)| n).collect::<Vec<_>>())
            .filter(|neighbor| !layout.is_open(*neighbor))
            .count();
        assert_eq!(geometry.wall_quad_count(), expected_faces);

        for group in [MaterialGroup::WallEven, MaterialGroup::WallOdd] {
            for base in quad_bases(&geometry, group) {
                let normal = Vec3::from(geometry.normals[base]);
                let centroid = (0..4)
                    .map(|i| Vec3::from(geometry.positions[base + i]))
                    .sum::<Vec3>()
                    / 4.0;
                assert!((centroid.y - HEIGHT / 2.0).abs() < 1e-5);

                let front = world_to_cell(centroid + normal * (PITCH / 2.0));
                let back = world_to_cell(centroid - normal * (PITCH / 2.0));
                assert!(layout.is_open(front), "wall face at {centroid} faces a wall");
                assert!(!layout.is_open(back));
                assert_eq!(MaterialGroup::for_wall(back), group);
            }
        }
    }

    #[test]
    fn test_both_wall_channels_used() {
        let geometry = synthesize(&sample_layout(), PITCH, HEIGHT);
        assert!(geometry.quad_count(MaterialGroup::WallEven) > 0);
        assert!(geometry.quad_count(MaterialGroup::WallOdd) > 0);
    }

    #[test]
    fn test_winding_matches_normals() {
        let geometry = synthesize(&sample_layout(), PITCH, HEIGHT);

        for [a, b, c] in geometry.triangles() {
            let pa = Vec3::from(geometry.positions[a as usize]);
            let pb = Vec3::from(geometry.positions[b as usize]);
            let pc = Vec3::from(geometry.positions[c as usize]);
            let face_normal = (pb - pa).cross(pc - pa).normalize();
            let stored = Vec3::from(geometry.normals[a as usize]);
            assert!(face_normal.dot(stored) > 0.999, "triangle {a},{b},{c} wound inward");
        }
    }

    #[test]
    fn test_channel_meshes_and_collider() {
        let layout = sample_layout();
        let geometry = synthesize(&layout, PITCH, HEIGHT);

        let floor = geometry.to_mesh(MaterialGroup::Floor);
        assert_eq!(floor.count_vertices(), layout.open_count() * 4);
        assert!(floor.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(floor.attribute(Mesh::ATTRIBUTE_UV_0).is_some());
        assert_eq!(
            floor.indices().map(|indices| indices.len()),
            Some(layout.open_count() * 6)
        );

        let walls = geometry.to_mesh(MaterialGroup::WallEven);
        assert_eq!(
            walls.count_vertices(),
            geometry.quad_count(MaterialGroup::WallEven) * 4
        );

        assert!(geometry.to_collider().is_ok());
    }
}
