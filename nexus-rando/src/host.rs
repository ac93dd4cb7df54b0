//! Collaborator traits for the game host and the capabilities nexus objects
//! expose to it.
use serde::{Deserialize, Serialize};

use crate::doors::DoorId;
use crate::widgets::AuthorPlacard;

/// Entity type name of level doors.
pub const DOOR_ENTITY: &str = "level_door";

/// Snapshot of a door entity as the host reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorEntity {
    pub id: DoorId,
    pub type_name: String,
    pub x: f32,
    pub y: f32,
    pub layer: i32,
    /// Level the door leads to; empty on template doors.
    pub file_name: String,
    pub door_set: i32,
    pub display_name: String,
}

impl DoorEntity {
    #[must_use]
    pub fn is_level_door(&self) -> bool {
        self.type_name == DOOR_ENTITY
    }
}

/// A door to spawn in place of an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoor {
    pub x: f32,
    pub y: f32,
    pub layer: i32,
    pub file_name: String,
    pub door_set: i32,
    pub display_name: String,
}

/// Scene operations the nexus needs from the host.
pub trait SceneHost {
    /// Look up a door by entity ID.
    fn door(&self, id: DoorId) -> Option<DoorEntity>;

    /// Remove the door `old` and add `door` in its place.
    fn replace_door(&mut self, old: DoorId, door: NewDoor);

    /// Spawn an author placard.
    fn add_placard(&mut self, placard: AuthorPlacard);

    fn set_layer_visible(&mut self, layer: i32, visible: bool);

    /// Whether the player is on a new-game-plus save.
    fn is_new_game_plus(&self) -> bool;
}

/// A single text draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    pub layer: i32,
    pub sub_layer: i32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub colour: u32,
}

/// Text rendering supplied by the host.
pub trait Canvas {
    fn draw_text(&mut self, draw: TextDraw);
}

/// Advanced once per host frame.
pub trait Steppable {
    fn step(&mut self, host: &mut dyn SceneHost);
}

/// Rendered once per host frame.
pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas);
}

/// Fired when the player touches a trigger.
pub trait Activatable {
    fn activate(&mut self, host: &mut dyn SceneHost);
}
