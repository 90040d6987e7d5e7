#![allow(dead_code)]

use std::time::{Duration, Instant};

use astronaut_float::{components::FigureSettings, loader::MemorySource, scene::MapSlot};
use base64::Engine;
use serde_json::json;

pub fn png(rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

fn push_f32s(buffer: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
}

/// Two triangles on two nodes. The second node bobs up over two seconds.
/// `with_clip` controls whether the file has an animation at all.
pub fn figure_gltf(with_clip: bool) -> Vec<u8> {
    let mut buffer = Vec::new();
    push_f32s(&mut buffer, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    push_f32s(&mut buffer, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    for index in [0u16, 1, 2] {
        buffer.extend_from_slice(&index.to_le_bytes());
    }
    buffer.extend_from_slice(&[0, 0]);
    push_f32s(&mut buffer, &[0.0, 2.0]);
    push_f32s(&mut buffer, &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buffer)
    );
    let animations = if with_clip {
        json!([{
            "name": "Idle",
            "channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }],
            "samplers": [{ "input": 3, "output": 4, "interpolation": "LINEAR" }]
        }])
    } else {
        json!([])
    };

    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Suit", "mesh": 0, "children": [1] },
            { "name": "Visor", "mesh": 0 }
        ],
        "meshes": [{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1 },
                "indices": 2,
                "material": 0
            }]
        }],
        "materials": [{ "name": "Fabric", "alphaMode": "BLEND" }],
        "animations": animations,
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": 3, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [2.0] },
            { "bufferView": 4, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 72, "byteLength": 6 },
            { "buffer": 0, "byteOffset": 80, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 88, "byteLength": 24 }
        ],
        "buffers": [{ "byteLength": 112, "uri": uri }]
    });
    serde_json::to_vec(&document).unwrap()
}

/// All six figure assets, under the paths the settings ask for.
pub fn figure_source(settings: &FigureSettings, with_clip: bool) -> MemorySource {
    let mut source = MemorySource::new().with_file(settings.model.as_str(), figure_gltf(with_clip));
    for slot in MapSlot::ALL {
        source.insert(settings.map(slot), png([slot.index() as u8, 0, 0, 255]));
    }
    source
}

/// Polls until `done` holds. Gives up after ten seconds and lets the assertions fail.
pub fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
}
