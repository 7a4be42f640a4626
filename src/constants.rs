pub const RENDER_WIDTH: i32 = 1920;           // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the render texture
pub const FPS: u32 = 60;                      // Frames per second

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3000; // Time between automatic rotations
pub const DEFAULT_TRANSITION_MS: u64 = 400;     // Duration of a posture change on screen

pub const ERROR_DISPLAY_DURATION: f32 = 5.0;  // How long start-up errors stay on screen (seconds)
