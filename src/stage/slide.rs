use std::rc::Rc;
use std::time::Duration;

use log::warn;
use raylib::prelude::*;

use crate::constants::*;
use crate::rotator::posture::Posture;

/// How posture changes are animated.
#[derive(Clone, Copy)]
pub struct Transition {
    duration: f32, // seconds
    easing: ease::EaseFn,
}

impl Transition {
    pub fn new(duration: Duration, curve: &str) -> Self {
        // CSS curve names; an empty curve is the CSS default, "ease"
        let easing: ease::EaseFn = match curve {
            "" | "ease" => ease::sine_in_out,
            "linear" => ease::linear_none,
            "ease-in" => ease::cubic_in,
            "ease-out" => ease::cubic_out,
            "ease-in-out" => ease::cubic_in_out,
            other => {
                warn!("unknown transition curve '{}', using 'ease'", other);
                ease::sine_in_out
            }
        };
        Self { duration: duration.as_secs_f32(), easing }
    }

    fn is_instant(&self) -> bool {
        self.duration <= 0.0
    }
}

// --- One transition in flight: a tween per animated property ---
struct Motion {
    start_visible: bool, // hidden -> hidden moves are never shown

    end_position: Vector2,
    end_opacity: f32,

    tween_x: ease::Tween,
    tween_y: ease::Tween,
    tween_opacity: ease::Tween,
}

/// One slide on the stage. `I` is the image handle; copies of a slide
/// share it.
pub struct Slide<I> {
    image: I,

    visible: bool,
    placed: bool, // false until the first posture lands

    position: Vector2, // top-left corner, in stage widths/heights
    opacity: f32,

    motion: Option<Motion>,
}

impl<I> Slide<I> {
    pub fn new(image: I) -> Self {
        Self {
            image,
            visible: false,
            placed: false,
            position: Vector2::new(0.0, 0.0),
            opacity: 1.0,
            motion: None,
        }
    }

    pub fn image(&self) -> &I {
        &self.image
    }

    pub fn apply_posture(&mut self, posture: Posture, transition: &Transition) {
        // Missing offset/opacity in the posture keep the current value
        let end_position = posture
            .offset
            .map(|offset| {
                let (x, y) = offset.displacement();
                Vector2::new(x, y)
            })
            .unwrap_or(self.position);
        let end_opacity = posture.opacity.unwrap_or(self.opacity);
        let start_visible = self.visible;
        self.visible = posture.visible;

        // First posture is the starting state: no transition on initial paint
        let unchanged = end_position == self.position && end_opacity == self.opacity;
        if !self.placed || unchanged || transition.is_instant() {
            self.placed = true;
            self.position = end_position;
            self.opacity = end_opacity;
            self.motion = None;
            return;
        }

        // Retargeting mid-transition starts from wherever the slide is now
        self.motion = Some(Motion {
            start_visible,
            end_position,
            end_opacity,
            tween_x: ease::Tween::new(transition.easing, self.position.x, end_position.x, transition.duration),
            tween_y: ease::Tween::new(transition.easing, self.position.y, end_position.y, transition.duration),
            tween_opacity: ease::Tween::new(transition.easing, self.opacity, end_opacity, transition.duration),
        });
    }

    pub fn update(&mut self, dt: f32) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };

        self.position.x = motion.tween_x.apply(dt);
        self.position.y = motion.tween_y.apply(dt);
        self.opacity = motion.tween_opacity.apply(dt);

        if motion.tween_opacity.has_completed() {
            // Snap to the exact target, easing curves may land a hair off
            self.position = motion.end_position;
            self.opacity = motion.end_opacity;
            self.motion = None;
        }
    }

    /// Drawn while visible, or while still leaving a visible state.
    /// A slide moving between two hidden postures stays off screen, like
    /// an element whose `visibility` is transitioned.
    pub fn is_drawn(&self) -> bool {
        self.visible || self.motion.as_ref().is_some_and(|m| m.start_visible)
    }
}

#[cfg(test)]
impl<I> Slide<I> {
    pub fn is_transitioning(&self) -> bool {
        self.motion.is_some()
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl Slide<Rc<Texture2D>> {
    /// Fills the render area, cropping the image to its aspect ratio.
    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        if !self.is_drawn() {
            return;
        }

        let screen_width = RENDER_WIDTH as f32;
        let screen_height = RENDER_HEIGHT as f32;

        let tex_width = self.image.width() as f32;
        let tex_height = self.image.height() as f32;

        let scale = (screen_width / tex_width).max(screen_height / tex_height);
        let source_width = screen_width / scale;
        let source_height = screen_height / scale;
        let source_rec = Rectangle::new(
            (tex_width - source_width) * 0.5,
            (tex_height - source_height) * 0.5,
            source_width,
            source_height,
        );

        d.draw_texture_pro(
            &*self.image,
            source_rec,
            Rectangle::new(
                self.position.x * screen_width,
                self.position.y * screen_height,
                screen_width,
                screen_height,
            ),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE.fade(self.opacity),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotator::posture::{Axis, Phase, PostureTable};

    const EPSILON: f32 = 1e-4;

    fn transition(ms: u64, curve: &str) -> Transition {
        Transition::new(Duration::from_millis(ms), curve)
    }

    fn placed_slide(table: &PostureTable, phase: Phase) -> Slide<u8> {
        let mut slide = Slide::new(0);
        slide.apply_posture(table.get(phase), &transition(400, ""));
        slide
    }

    #[test]
    fn first_posture_applies_at_once() {
        let table = PostureTable::new(true, Axis::Left);
        let slide = placed_slide(&table, Phase::Incoming);

        assert!(!slide.is_transitioning());
        assert_eq!(slide.position(), Vector2::new(1.0, 0.0));
        assert_eq!(slide.opacity(), 0.0);
        assert!(!slide.is_drawn());
    }

    #[test]
    fn later_postures_transition_then_settle() {
        let table = PostureTable::new(true, Axis::Left);
        let mut slide = placed_slide(&table, Phase::Incoming);

        slide.apply_posture(table.get(Phase::Active), &transition(1000, "linear"));
        assert!(slide.is_transitioning());

        slide.update(0.5);
        assert!((slide.position().x - 0.5).abs() < EPSILON);
        assert!((slide.opacity() - 0.5).abs() < EPSILON);

        slide.update(0.6);
        assert!(!slide.is_transitioning());
        assert_eq!(slide.position(), Vector2::new(0.0, 0.0));
        assert_eq!(slide.opacity(), 1.0);
    }

    #[test]
    fn curve_name_picks_the_easing() {
        let table = PostureTable::new(false, Axis::Top);
        let mut slide = placed_slide(&table, Phase::Active);

        slide.apply_posture(table.get(Phase::Outgoing), &transition(1000, "ease-in"));
        slide.update(0.5);

        // cubic ease-in covers an eighth of the way at half time
        assert!((slide.position().y + 0.125).abs() < EPSILON);
    }

    #[test]
    fn unknown_curve_still_completes() {
        let table = PostureTable::new(true, Axis::None);
        let mut slide = placed_slide(&table, Phase::Active);

        slide.apply_posture(table.get(Phase::Outgoing), &transition(200, "wobbly"));
        slide.update(0.25);
        assert_eq!(slide.opacity(), 0.0);
    }

    #[test]
    fn zero_duration_is_instant() {
        let table = PostureTable::new(true, Axis::Right);
        let mut slide = placed_slide(&table, Phase::Active);

        slide.apply_posture(table.get(Phase::Outgoing), &transition(0, ""));

        assert!(!slide.is_transitioning());
        assert_eq!(slide.position(), Vector2::new(1.0, 0.0));
    }

    #[test]
    fn outgoing_slide_is_drawn_until_it_leaves() {
        let table = PostureTable::new(true, Axis::Left);
        let mut slide = placed_slide(&table, Phase::Active);

        slide.apply_posture(table.get(Phase::Outgoing), &transition(400, ""));
        assert!(slide.is_drawn());

        slide.update(0.5);
        assert!(!slide.is_drawn());
        assert_eq!(slide.position(), Vector2::new(-1.0, 0.0));
    }

    #[test]
    fn missing_offset_and_opacity_keep_current_values() {
        let table = PostureTable::new(false, Axis::None);
        let mut slide = placed_slide(&table, Phase::Active);

        slide.apply_posture(table.get(Phase::Incoming), &transition(400, ""));
        slide.update(0.5);

        assert_eq!(slide.position(), Vector2::new(0.0, 0.0));
        assert_eq!(slide.opacity(), 1.0);
    }

    #[test]
    fn hidden_to_hidden_move_is_never_drawn() {
        // Without fade the opacity stays at 1, only visibility hides the slide
        let table = PostureTable::new(false, Axis::Bottom);
        let mut slide = placed_slide(&table, Phase::Outgoing);

        slide.apply_posture(table.get(Phase::Incoming), &transition(400, ""));
        assert!(slide.is_transitioning());
        assert!(!slide.is_drawn());

        slide.update(0.2);
        assert!(!slide.is_drawn());
        assert_eq!(slide.opacity(), 1.0);
    }

    #[test]
    fn hidden_slide_shows_as_soon_as_it_becomes_active() {
        let table = PostureTable::new(false, Axis::Bottom);
        let mut slide = placed_slide(&table, Phase::Incoming);

        slide.apply_posture(table.get(Phase::Active), &transition(400, ""));
        assert!(slide.is_drawn());
    }
}
