//! Rotation postures: the three style states a slide can be put in by the
//! rotator, derived once from the effect configuration.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigurationError;

/// Which offset property drives the slide-in/out motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Left,
    Right,
    Top,
    Bottom,
    None,
}

impl Axis {
    pub fn edge(self) -> Option<Edge> {
        match self {
            Axis::Left => Some(Edge::Left),
            Axis::Right => Some(Edge::Right),
            Axis::Top => Some(Edge::Top),
            Axis::Bottom => Some(Edge::Bottom),
            Axis::None => None,
        }
    }
}

impl FromStr for Axis {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Axis::Left),
            "right" => Ok(Axis::Right),
            "top" => Ok(Axis::Top),
            "bottom" => Ok(Axis::Bottom),
            "none" => Ok(Axis::None),
            other => Err(ConfigurationError::UnknownAxis(other.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Left => "left",
            Axis::Right => "right",
            Axis::Top => "top",
            Axis::Bottom => "bottom",
            Axis::None => "none",
        };
        f.write_str(name)
    }
}

/// The stage edge an offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// An offset from one edge, as a fraction of the stage size (1.0 = 100%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub edge: Edge,
    pub amount: f32,
}

impl Offset {
    /// Displacement of the slide's top-left corner, as fractions of the
    /// stage width and height. Offsets from the right/bottom edges push
    /// the slide the opposite way.
    pub fn displacement(&self) -> (f32, f32) {
        match self.edge {
            Edge::Left => (self.amount, 0.0),
            Edge::Right => (-self.amount, 0.0),
            Edge::Top => (0.0, self.amount),
            Edge::Bottom => (0.0, -self.amount),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Outgoing, // just vacated
    Active,   // centered
    Incoming, // next in line
}

// --- Style state assigned to a slide ---
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posture {
    pub phase: Phase,
    pub visible: bool,
    pub opacity: Option<f32>,   // None without fade: opacity left untouched
    pub offset: Option<Offset>, // None for Axis::None: position left untouched
}

/// Outgoing, active and incoming postures, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct PostureTable {
    postures: [Posture; 3],
}

impl PostureTable {
    pub fn new(fade: bool, axis: Axis) -> Self {
        let posture = |phase: Phase, visible: bool, opacity: f32, amount: f32| Posture {
            phase,
            visible,
            opacity: fade.then_some(opacity),
            offset: axis.edge().map(|edge| Offset { edge, amount }),
        };

        // Outgoing sits one stage-length before the edge, incoming one after
        Self {
            postures: [
                posture(Phase::Outgoing, false, 0.0, -1.0),
                posture(Phase::Active, true, 1.0, 0.0),
                posture(Phase::Incoming, false, 0.0, 1.0),
            ],
        }
    }

    pub fn get(&self, phase: Phase) -> Posture {
        match phase {
            Phase::Outgoing => self.postures[0],
            Phase::Active => self.postures[1],
            Phase::Incoming => self.postures[2],
        }
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Posture> {
        self.postures.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_sets_opacity_on_every_posture() {
        let table = PostureTable::new(true, Axis::None);
        assert_eq!(table.get(Phase::Outgoing).opacity, Some(0.0));
        assert_eq!(table.get(Phase::Active).opacity, Some(1.0));
        assert_eq!(table.get(Phase::Incoming).opacity, Some(0.0));
        assert!(table.iter().all(|p| p.offset.is_none()));
    }

    #[test]
    fn no_fade_leaves_opacity_alone() {
        let table = PostureTable::new(false, Axis::Bottom);
        assert!(table.iter().all(|p| p.opacity.is_none()));
    }

    #[test]
    fn axis_drives_offsets_on_both_sides() {
        let table = PostureTable::new(false, Axis::Left);
        let amounts: Vec<f32> = table.iter().map(|p| p.offset.unwrap().amount).collect();
        assert_eq!(amounts, vec![-1.0, 0.0, 1.0]);
        assert!(table.iter().all(|p| p.offset.unwrap().edge == Edge::Left));
    }

    #[test]
    fn only_active_is_visible() {
        let table = PostureTable::new(true, Axis::Top);
        assert!(!table.get(Phase::Outgoing).visible);
        assert!(table.get(Phase::Active).visible);
        assert!(!table.get(Phase::Incoming).visible);
    }

    #[test]
    fn right_and_bottom_offsets_push_the_other_way() {
        let right = Offset { edge: Edge::Right, amount: -1.0 };
        let bottom = Offset { edge: Edge::Bottom, amount: 1.0 };
        assert_eq!(right.displacement(), (1.0, 0.0));
        assert_eq!(bottom.displacement(), (0.0, -1.0));
    }

    #[test]
    fn axis_parses_known_names_only() {
        assert_eq!("bottom".parse::<Axis>().unwrap(), Axis::Bottom);
        assert_eq!("none".parse::<Axis>().unwrap(), Axis::None);
        assert!(matches!(
            "diagonal".parse::<Axis>(),
            Err(ConfigurationError::UnknownAxis(name)) if name == "diagonal"
        ));
    }
}
