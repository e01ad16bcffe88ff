//! Part builders shared by the unit tests.

use assets::{ObjectId, RendererId, SpriteAsset, SpriteId, TransformId};
use common::{Color, Tint, Vec2};
use scene::{CharacterPart, PartCategory};
use std::sync::Arc;

pub fn solid_part(
    name: &str,
    position: (f32, f32),
    width: u32,
    height: u32,
    sorting_order: i32,
    color: Color,
) -> CharacterPart {
    let pixels = color.to_array().repeat((width * height) as usize);
    let sprite = SpriteAsset::from_rgba(SpriteId(1), name, width, height, pixels).unwrap();

    CharacterPart {
        name: name.to_string(),
        object_id: ObjectId(1),
        transform_id: TransformId(2),
        renderer_id: RendererId(3),
        sprite_id: Some(SpriteId(1)),
        sprite: Some(Arc::new(sprite)),
        position: Vec2::new(position.0, position.1),
        sorting_order,
        category: PartCategory::categorize(name),
        tint: Tint::IDENTITY,
        tint_corrected: false,
        active: true,
        selected: false,
    }
}

pub fn part(name: &str, position: (f32, f32), width: u32, height: u32, sorting_order: i32) -> CharacterPart {
    solid_part(name, position, width, height, sorting_order, Color::WHITE)
}
