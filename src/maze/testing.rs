use super::constructor::{MazeHost, TriggerMarker};
use super::mesh::MazeGeometry;
use crate::game_logic::errors::{MazeError, MazeResult};

#[derive(Debug, Clone)]
enum LiveObject {
    Geometry,
    Marker { marker: TriggerMarker, callback: &'static str },
}

/// In-memory host that records what is alive, for constructor and session tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next_handle: u32,
    live: Vec<(u32, LiveObject)>,
    pub fail_geometry: bool,
}

impl RecordingHost {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn spawned_total(&self) -> u32 {
        self.next_handle
    }

    pub fn is_live(&self, handle: u32) -> bool {
        self.live.iter().any(|(h, _)| *h == handle)
    }

    pub fn live_markers(&self) -> Vec<TriggerMarker> {
        self.live
            .iter()
            .filter_map(|(_, object)| match object {
                LiveObject::Marker { marker, .. } => Some(*marker),
                LiveObject::Geometry => None,
            })
            .collect()
    }

    pub fn callback_of(&self, handle: u32) -> Option<&'static str> {
        self.live.iter().find_map(|(h, object)| match object {
            LiveObject::Marker { callback, .. } if *h == handle => Some(*callback),
            _ => None,
        })
    }
}

impl MazeHost for RecordingHost {
    type Handle = u32;
    type Callback = &'static str;

    fn spawn_geometry(&mut self, geometry: &MazeGeometry) -> MazeResult<u32> {
        assert!(!geometry.floor_indices.is_empty(), "geometry without a floor");
        if self.fail_geometry {
            return Err(MazeError::ColliderBuildFailed {
                reason: "host refused geometry".to_string(),
            });
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.push((handle, LiveObject::Geometry));
        Ok(handle)
    }

    fn spawn_marker(&mut self, marker: &TriggerMarker, callback: &'static str) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.push((
            handle,
            LiveObject::Marker {
                marker: *marker,
                callback,
            },
        ));
        handle
    }

    fn despawn(&mut self, handle: u32) {
        let before = self.live.len();
        self.live.retain(|(h, _)| *h != handle);
        assert_eq!(before, self.live.len() + 1, "despawned unknown handle {handle}");
    }
}
