pub mod slide;

use std::rc::Rc;

use log::debug;
use raylib::prelude::*;

use crate::config::EffectConfig;
use crate::rotator::SlideAdapter;
use crate::rotator::posture::Posture;
use crate::stage::slide::{Slide, Transition};

/// The slides on screen, in stacking order.
pub struct Stage<I> {
    slides: Vec<Slide<I>>,
    transition: Transition,
}

impl<I: Clone> Stage<I> {
    pub fn new(images: Vec<I>, config: &EffectConfig) -> Self {
        Self {
            slides: images.into_iter().map(Slide::new).collect(),
            transition: Transition::new(config.transition(), &config.transition_curve),
        }
    }

    pub fn update(&mut self, dt: f32) {
        for slide in self.slides.iter_mut() {
            slide.update(dt);
        }
    }
}

#[cfg(test)]
impl<I> Stage<I> {
    pub fn slides(&self) -> &[Slide<I>] {
        &self.slides
    }
}

impl<I: Clone> SlideAdapter for Stage<I> {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn apply_posture(&mut self, index: usize, posture: Posture) {
        // Indices come from the rotator's cycle(), out of range never happens in practice
        if let Some(slide) = self.slides.get_mut(index) {
            slide.apply_posture(posture, &self.transition);
        }
    }

    fn duplicate_slides_if_two(&mut self) {
        if self.slides.len() != 2 {
            return;
        }
        // Copies share the image handle, only the transition state is new
        let copies: Vec<Slide<I>> = self
            .slides
            .iter()
            .map(|slide| Slide::new(slide.image().clone()))
            .collect();
        self.slides.extend(copies);
        debug!("duplicated a two-slide set to {} slides", self.slides.len());
    }
}

impl Stage<Rc<Texture2D>> {
    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        for slide in self.slides.iter() {
            slide.draw(d);
        }
    }
}
