use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Configuration for first-person movement
#[derive(Debug, Clone, Copy)]
pub struct FpsMovementConfig {
    pub gravity_force: f32,
    pub pitch_limit: f32,
}

impl Default for FpsMovementConfig {
    fn default() -> Self {
        Self {
            gravity_force: 9.81,
            pitch_limit: FRAC_PI_2 - 0.01,
        }
    }
}

/// Camera orientation split into body yaw and head pitch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl LookAngles {
    /// Apply a mouse delta. Moving right turns right, moving up looks up.
    ///
    /// # Examples
    /// ```
    /// use mazerun::game_logic::movement::{FpsMovementConfig, LookAngles};
    /// use bevy::prelude::Vec2;
    ///
    /// let config = FpsMovementConfig::default();
    /// let look = LookAngles::default().apply_mouse(Vec2::new(0.0, -10_000.0), 1.0, config);
    /// assert_eq!(look.pitch, config.pitch_limit);
    /// ```
    pub fn apply_mouse(self, delta: Vec2, sensitivity: f32, config: FpsMovementConfig) -> Self {
        Self {
            yaw: self.yaw - delta.x * sensitivity,
            pitch: (self.pitch - delta.y * sensitivity)
                .clamp(-config.pitch_limit, config.pitch_limit),
        }
    }

    pub fn body_rotation(self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn head_rotation(self) -> Quat {
        Quat::from_rotation_x(self.pitch)
    }
}

/// Gather WASD / arrow keys into a planar input: x strafes right, y walks forward.
pub fn keyboard_input(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let mut input = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        input.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        input.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        input.x += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        input.x -= 1.0;
    }
    input
}

/// Horizontal translation for one frame, relative to the body yaw.
///
/// Diagonal input is clamped so it is never faster than straight movement.
pub fn planar_translation(input: Vec2, yaw: f32, speed: f32, delta_time: f32) -> Vec3 {
    let input = input.clamp_length_max(1.0);
    let rotation = Quat::from_rotation_y(yaw);
    let forward = rotation * Vec3::NEG_Z;
    let right = rotation * Vec3::X;
    (forward * input.y + right * input.x) * speed * delta_time
}

/// Add a downward component so the character controller keeps the player grounded.
pub fn apply_gravity(translation: Vec3, delta_time: f32, config: FpsMovementConfig) -> Vec3 {
    Vec3::new(
        translation.x,
        translation.y - config.gravity_force * delta_time,
        translation.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_forward_at_zero_yaw_is_negative_z() {
        let translation = planar_translation(Vec2::new(0.0, 1.0), 0.0, 2.0, 0.5);
        assert!(approx(translation, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_strafe_right_is_positive_x() {
        let translation = planar_translation(Vec2::new(1.0, 0.0), 0.0, 1.0, 1.0);
        assert!(approx(translation, Vec3::X));
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let translation = planar_translation(Vec2::new(1.0, 1.0), 0.3, 4.0, 1.0);
        assert!((translation.length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_turns_forward() {
        let translation = planar_translation(Vec2::Y, FRAC_PI_2, 1.0, 1.0);
        assert!(approx(translation, Vec3::NEG_X));
    }

    #[test]
    fn test_mouse_turns_and_clamps() {
        let config = FpsMovementConfig::default();
        let look = LookAngles::default().apply_mouse(Vec2::new(10.0, 0.0), 0.01, config);
        assert!((look.yaw + 0.1).abs() < 1e-6);
        assert_eq!(look.pitch, 0.0);

        let look = look.apply_mouse(Vec2::new(0.0, 1_000.0), 0.01, config);
        assert_eq!(look.pitch, -config.pitch_limit);
    }

    #[test]
    fn test_gravity_only_changes_y() {
        let config = FpsMovementConfig::default();
        let result = apply_gravity(Vec3::new(1.0, 0.0, 0.5), 1.0 / 60.0, config);
        assert_eq!(result.x, 1.0);
        assert_eq!(result.z, 0.5);
        assert!((result.y + config.gravity_force / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_keyboard_input() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyA);
        assert_eq!(keyboard_input(&keys), Vec2::new(-1.0, 1.0));

        keys.press(KeyCode::KeyS);
        assert_eq!(keyboard_input(&keys), Vec2::new(-1.0, 0.0));
    }
}
