//! Small scene objects: seed readout, author placards, and layer toggles.
use serde::{Deserialize, Serialize};

use crate::host::{Activatable, Canvas, Drawable, SceneHost, Steppable, TextDraw};

const WHITE: u32 = 0xFFFF_FFFF;
/// Placards snap to this vertical grid before drawing.
const PLACARD_GRID: f32 = 48.0;

/// Draws the active seed, suffixed with `*` on new-game-plus saves.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDisplay {
    pub x: f32,
    pub y: f32,
    pub layer: i32,
    pub sub_layer: i32,
    pub colour: u32,
    seed: String,
    new_game_plus: Option<bool>,
}

impl SeedDisplay {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            layer: 20,
            sub_layer: 3,
            colour: WHITE,
            seed: String::new(),
            new_game_plus: None,
        }
    }

    pub fn set_seed(&mut self, seed: impl Into<String>) {
        self.seed = seed.into();
    }

    #[must_use]
    pub fn label(&self) -> String {
        if self.new_game_plus == Some(true) {
            format!("{}*", self.seed)
        } else {
            self.seed.clone()
        }
    }
}

impl Steppable for SeedDisplay {
    fn step(&mut self, host: &mut dyn SceneHost) {
        if self.new_game_plus.is_none() {
            self.new_game_plus = Some(host.is_new_game_plus());
        }
    }
}

impl Drawable for SeedDisplay {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_text(TextDraw {
            text: self.label(),
            layer: self.layer,
            sub_layer: self.sub_layer,
            x: self.x,
            y: self.y,
            scale: 0.8,
            colour: self.colour,
        });
    }
}

/// Name of a level's author drawn beneath its door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorPlacard {
    pub author: String,
    pub x: f32,
    pub y: f32,
}

impl AuthorPlacard {
    #[must_use]
    pub fn new(author: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            author: author.into(),
            x,
            y,
        }
    }
}

impl Drawable for AuthorPlacard {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_text(TextDraw {
            text: self.author.clone(),
            layer: 21,
            sub_layer: 22,
            x: self.x,
            y: PLACARD_GRID * (self.y / PLACARD_GRID).round() + 10.0,
            scale: 0.5,
            colour: WHITE,
        });
    }
}

/// Shows or hides a scene layer when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleLayer {
    pub layer: i32,
    pub show: bool,
}

impl Default for ToggleLayer {
    fn default() -> Self {
        Self {
            layer: 18,
            show: false,
        }
    }
}

impl Activatable for ToggleLayer {
    fn activate(&mut self, host: &mut dyn SceneHost) {
        host.set_layer_visible(self.layer, self.show);
    }
}
