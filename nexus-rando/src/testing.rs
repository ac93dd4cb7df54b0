//! Host doubles shared by unit tests.
use std::collections::HashMap;

use crate::doors::DoorId;
use crate::host::{Canvas, DOOR_ENTITY, DoorEntity, NewDoor, SceneHost, TextDraw};
use crate::widgets::AuthorPlacard;

#[derive(Debug, Default)]
pub struct MockScene {
    pub doors: HashMap<DoorId, DoorEntity>,
    pub replaced: Vec<(DoorId, NewDoor)>,
    pub placards: Vec<AuthorPlacard>,
    pub layers: Vec<(i32, bool)>,
    pub new_game_plus: bool,
}

impl MockScene {
    pub fn with_template_doors(ids: impl IntoIterator<Item = DoorId>) -> Self {
        let mut scene = Self::default();
        for (n, id) in ids.into_iter().enumerate() {
            let offset = f32::from(u16::try_from(n).unwrap());
            scene.doors.insert(id, template_door(id, offset * 96.0, 480.0));
        }
        scene
    }
}

pub fn template_door(id: DoorId, x: f32, y: f32) -> DoorEntity {
    DoorEntity {
        id,
        type_name: DOOR_ENTITY.to_string(),
        x,
        y,
        layer: 19,
        file_name: String::new(),
        door_set: 5,
        display_name: String::new(),
    }
}

impl SceneHost for MockScene {
    fn door(&self, id: DoorId) -> Option<DoorEntity> {
        self.doors.get(&id).cloned()
    }

    fn replace_door(&mut self, old: DoorId, door: NewDoor) {
        self.doors.remove(&old);
        self.replaced.push((old, door));
    }

    fn add_placard(&mut self, placard: AuthorPlacard) {
        self.placards.push(placard);
    }

    fn set_layer_visible(&mut self, layer: i32, visible: bool) {
        self.layers.push((layer, visible));
    }

    fn is_new_game_plus(&self) -> bool {
        self.new_game_plus
    }
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub draws: Vec<TextDraw>,
}

impl Canvas for RecordingCanvas {
    fn draw_text(&mut self, draw: TextDraw) {
        self.draws.push(draw);
    }
}
