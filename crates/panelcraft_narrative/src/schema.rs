//! Response schemas for JSON-mode generation.

use serde_json::{Value, json};

fn beat_item() -> Value {
    json!({
        "type": "object",
        "properties": {
            "caption": {
                "type": "string",
                "description": "Panel narration or a character's thought, about 30 words."
            },
            "depiction": {
                "type": "string",
                "description": "English prompt for an image model: people, clothing, hair and eye color, setting, buildings, lighting, weather, time of day, camera and composition, mood. About 150 words."
            }
        },
        "required": ["caption", "depiction"]
    })
}

/// Schema for a JSON array of story beats.
pub fn beats_schema() -> Value {
    json!({
        "type": "array",
        "description": "Sequential comic panels breaking the story text into its smallest visual moments, around 10 panels.",
        "items": beat_item()
    })
}

/// Schema for a whole story part produced by a single call.
pub fn story_part_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "outline": {
                "type": "string",
                "description": "Bullet outline of the events in this part."
            },
            "story": {
                "type": "string",
                "description": "Prose narrating the outlined events."
            },
            "story_beats": beats_schema()
        },
        "propertyOrdering": ["outline", "story", "story_beats"],
        "required": ["outline", "story", "story_beats"]
    })
}
