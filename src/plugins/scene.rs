use crate::components::*;
use crate::maze::{MarkerKind, MaterialGroup};
use bevy::prelude::*;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
            .add_systems(Startup, (setup_materials, setup_lights));
    }
}

/// Materials shared by every maze: two wall tints, the floor and one per marker kind.
#[derive(Resource)]
pub struct MazeMaterials {
    pub wall_even: Handle<StandardMaterial>,
    pub wall_odd: Handle<StandardMaterial>,
    pub floor: Handle<StandardMaterial>,
    pub start_marker: Handle<StandardMaterial>,
    pub goal_marker: Handle<StandardMaterial>,
}

impl MazeMaterials {
    pub fn for_group(&self, group: MaterialGroup) -> Handle<StandardMaterial> {
        match group {
            MaterialGroup::WallEven => self.wall_even.clone(),
            MaterialGroup::WallOdd => self.wall_odd.clone(),
            MaterialGroup::Floor => self.floor.clone(),
        }
    }

    pub fn for_marker(&self, kind: MarkerKind) -> Handle<StandardMaterial> {
        match kind {
            MarkerKind::Start => self.start_marker.clone(),
            MarkerKind::Goal => self.goal_marker.clone(),
        }
    }
}

fn setup_materials(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    let mut add = |base_color: Color, emissive: LinearRgba| {
        materials.add(StandardMaterial {
            base_color,
            emissive,
            perceptual_roughness: 0.9,
            ..default()
        })
    };

    commands.insert_resource(MazeMaterials {
        wall_even: add(Color::srgb(0.55, 0.45, 0.35), LinearRgba::BLACK),
        wall_odd: add(Color::srgb(0.45, 0.38, 0.30), LinearRgba::BLACK),
        floor: add(Color::srgb(0.25, 0.25, 0.28), LinearRgba::BLACK),
        start_marker: add(Color::srgb(0.2, 0.4, 0.9), LinearRgba::rgb(0.0, 0.1, 0.6)),
        goal_marker: add(Color::srgb(0.95, 0.8, 0.2), LinearRgba::rgb(0.8, 0.6, 0.0)),
    });
}

fn setup_lights(mut commands: Commands, light_query: Query<&SceneLight>) {
    if !light_query.is_empty() {
        return;
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform {
            translation: Vec3::new(0.0, 20.0, 0.0),
            rotation: Quat::from_euler(EulerRot::XYZ, -1.0, -0.4, 0.0),
            ..default()
        },
        SceneLight,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        affects_lightmapped_meshes: false,
    });
}
