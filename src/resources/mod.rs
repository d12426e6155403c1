use crate::config::range_types::*;
use crate::game_logic::errors::{MazeError, MazeResult};
use crate::maze::ConstructionSettings;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Random source for carving and marker placement. Seeded from config or at random.
#[derive(Resource)]
pub struct MazeRng(pub Pcg64);

impl MazeRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        info!("Maze seed: {seed}");
        Self(Pcg64::seed_from_u64(seed))
    }
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
// NOTE: When adding new fields, give them a default so older config files keep loading
pub struct GameConfig {
    pub maze: MazeSettings,
    pub session: SessionSettings,
    pub player: PlayerSettings,
    pub ui: UiSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
#[serde(default)]
pub struct MazeSettings {
    // Each new maze picks rows and cols uniformly from these inclusive ranges
    #[validate(range(min = 3, max = 101))]
    pub min_rows: usize,
    #[validate(range(min = 3, max = 101))]
    pub max_rows: usize,
    #[validate(range(min = 3, max = 101))]
    pub min_cols: usize,
    #[validate(range(min = 3, max = 101))]
    pub max_cols: usize,

    pub cell_pitch: CellPitch,
    pub wall_height: WallHeight,
    pub seed: Option<u64>,
    pub place_start_trigger: bool,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            min_rows: 11,
            max_rows: 30,
            min_cols: 11,
            max_cols: 30,
            cell_pitch: CellPitch::default(),
            wall_height: WallHeight::default(),
            seed: None,
            place_start_trigger: false,
        }
    }
}

impl MazeSettings {
    pub fn construction_settings(&self) -> ConstructionSettings {
        ConstructionSettings {
            cell_pitch: self.cell_pitch.get(),
            wall_height: self.wall_height.get(),
            place_start_trigger: self.place_start_trigger,
        }
    }

    /// Requested (rows, cols) for the next maze, before odd normalization.
    pub fn random_dimensions<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        (
            rng.gen_range(self.min_rows..=self.max_rows),
            rng.gen_range(self.min_cols..=self.max_cols),
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct SessionSettings {
    pub regenerate_delay: RegenerateDelay,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PlayerSettings {
    pub move_speed: MovementSpeed,
    pub mouse_sensitivity: MouseSensitivity,
    pub spawn_height: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            move_speed: MovementSpeed::default(),
            mouse_sensitivity: MouseSensitivity::default(),
            spawn_height: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiSettings {
    pub window_width: f32,
    pub window_height: f32,
    pub hud_font_size: f32,
    pub show_debug: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 720.0,
            hud_font_size: 28.0,
            show_debug: false,
        }
    }
}

impl GameConfig {
    /// Range checks plus the min <= max relations validator cannot express per field.
    pub fn check(&self) -> MazeResult<()> {
        self.maze.validate().map_err(|validation_errors| {
            let error_details = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    format!("{field}: {}", error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            MazeError::InvalidConfig {
                reason: format!("maze settings: {error_details}"),
            }
        })?;

        if self.maze.min_rows > self.maze.max_rows {
            return Err(MazeError::InvalidConfig {
                reason: format!(
                    "min_rows ({}) exceeds max_rows ({})",
                    self.maze.min_rows, self.maze.max_rows
                ),
            });
        }
        if self.maze.min_cols > self.maze.max_cols {
            return Err(MazeError::InvalidConfig {
                reason: format!(
                    "min_cols ({}) exceeds max_cols ({})",
                    self.maze.min_cols, self.maze.max_cols
                ),
            });
        }

        // Unclamped floats; the range newtypes already handle their own
        let plain_floats = [
            ("player.spawn_height", self.player.spawn_height, false),
            ("ui.hud_font_size", self.ui.hud_font_size, true),
            ("ui.window_width", self.ui.window_width, true),
            ("ui.window_height", self.ui.window_height, true),
        ];
        for (field, value, must_be_positive) in plain_floats {
            if !value.is_finite() || (must_be_positive && value <= 0.0) {
                return Err(MazeError::InvalidConfig {
                    reason: format!("{field} is out of range: {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().check().is_ok());
    }

    #[test]
    fn test_non_finite_plain_floats_rejected() {
        let mut config = GameConfig::default();
        config.player.spawn_height = f32::NAN;
        assert!(matches!(
            config.check(),
            Err(MazeError::InvalidConfig { .. })
        ));

        let mut config = GameConfig::default();
        config.ui.hud_font_size = 0.0;
        assert!(config.check().is_err());
    }

    #[test]
    fn test_random_dimensions_stay_in_range() {
        let settings = MazeSettings::default();
        let mut rng = Pcg64::seed_from_u64(10);
        for _ in 0..200 {
            let (rows, cols) = settings.random_dimensions(&mut rng);
            assert!((11..=30).contains(&rows));
            assert!((11..=30).contains(&cols));
        }
    }

    #[test]
    fn test_construction_settings_follow_config() {
        let mut settings = MazeSettings::default();
        settings.cell_pitch = CellPitch::new(2.0);
        settings.place_start_trigger = true;

        let construction = settings.construction_settings();
        assert_eq!(construction.cell_pitch, 2.0);
        assert_eq!(construction.wall_height, 3.5);
        assert!(construction.place_start_trigger);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = MazeRng::from_seed(Some(5));
        let mut b = MazeRng::from_seed(Some(5));
        let draw = |rng: &mut MazeRng| rng.0.gen_range(0..1_000_000u32);
        assert_eq!(draw(&mut a), draw(&mut b));
    }
}
