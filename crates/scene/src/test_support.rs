//! Record builders shared by the unit tests.

use assets::RawRecord;
use serde_json::json;

pub fn object(id: u64, name: &str) -> RawRecord {
    RawRecord::new(id, "GameObject", json!({ "name": name }))
}

pub fn transform(id: u64, owner: u64, position: (f32, f32), parent: u64, children: &[u64]) -> RawRecord {
    RawRecord::new(
        id,
        "Transform",
        json!({
            "owner": owner,
            "position": { "x": position.0, "y": position.1, "z": 0.0 },
            "parent": parent,
            "children": children,
        }),
    )
}

pub fn renderer(id: u64, owner: u64, sprite: u64, sorting_order: i32) -> RawRecord {
    RawRecord::new(
        id,
        "SpriteRenderer",
        json!({ "owner": owner, "sprite": sprite, "sorting_order": sorting_order }),
    )
}
