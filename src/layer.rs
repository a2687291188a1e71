use crate::image::ImageRef;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Where a new text layer lands.
pub const DEFAULT_TEXT_POSITION: Position = Position { x: 50.0, y: 50.0, z: 0.0 };
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_SIZE: f32 = 24.0;
/// Offset applied to both axes of a duplicated layer.
pub const DUPLICATE_OFFSET: f32 = 20.0;

/// A unique identifier for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    /// Generates a fresh id; ids are never reused
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Text,
    Image,
}

/// Layer position. `z` feeds the 3D text depth, not the draw order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    #[default]
    None,
    Rotate,
    Float,
    Pulse,
    Wave,
    Bounce,
    Spiral,
    Glitch,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 8] = [
        AnimationKind::None,
        AnimationKind::Rotate,
        AnimationKind::Float,
        AnimationKind::Pulse,
        AnimationKind::Wave,
        AnimationKind::Bounce,
        AnimationKind::Spiral,
        AnimationKind::Glitch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimationKind::None => "none",
            AnimationKind::Rotate => "rotate",
            AnimationKind::Float => "float",
            AnimationKind::Pulse => "pulse",
            AnimationKind::Wave => "wave",
            AnimationKind::Bounce => "bounce",
            AnimationKind::Spiral => "spiral",
            AnimationKind::Glitch => "glitch",
        }
    }
}

/// Per-layer look: material parameters for the text renderer plus opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEffects {
    pub color: Color32,
    pub metalness: f32,
    pub roughness: f32,
    pub depth: f32,
    pub animation: AnimationKind,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
}

impl Default for VisualEffects {
    fn default() -> Self {
        Self {
            color: Color32::WHITE,
            metalness: 0.0,
            roughness: 0.0,
            depth: 0.0,
            animation: AnimationKind::None,
            opacity: 1.0,
        }
    }
}

/// Field-wise partial update of [`VisualEffects`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectsPatch {
    pub color: Option<Color32>,
    pub metalness: Option<f32>,
    pub roughness: Option<f32>,
    pub depth: Option<f32>,
    pub animation: Option<AnimationKind>,
    pub opacity: Option<f32>,
}

impl EffectsPatch {
    fn apply(&self, effects: &mut VisualEffects) {
        if let Some(color) = self.color {
            effects.color = color;
        }
        if let Some(metalness) = self.metalness {
            effects.metalness = metalness.clamp(0.0, 1.0);
        }
        if let Some(roughness) = self.roughness {
            effects.roughness = roughness.clamp(0.0, 1.0);
        }
        if let Some(depth) = self.depth {
            effects.depth = depth;
        }
        if let Some(animation) = self.animation {
            effects.animation = animation;
        }
        if let Some(opacity) = self.opacity {
            effects.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

/// Partial update carried by `Command::UpdateLayer`. `None` fields are left alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerPatch {
    pub content: Option<String>,
    pub position: Option<Position>,
    pub effects: EffectsPatch,
    pub visible: Option<bool>,
    pub behind_image: Option<bool>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
}

impl LayerPatch {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Default::default()
        }
    }

    pub fn behind_image(behind: bool) -> Self {
        Self {
            behind_image: Some(behind),
            ..Default::default()
        }
    }

    pub fn effects(effects: EffectsPatch) -> Self {
        Self {
            effects,
            ..Default::default()
        }
    }

    /// The patch that turns `before` into `after`, field by field.
    pub fn diff(before: &Layer, after: &Layer) -> Self {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            (a != b).then(|| b.clone())
        }
        let (e0, e1) = (&before.effects, &after.effects);
        Self {
            content: changed(&before.content, &after.content),
            position: changed(&before.position, &after.position),
            effects: EffectsPatch {
                color: changed(&e0.color, &e1.color),
                metalness: changed(&e0.metalness, &e1.metalness),
                roughness: changed(&e0.roughness, &e1.roughness),
                depth: changed(&e0.depth, &e1.depth),
                animation: changed(&e0.animation, &e1.animation),
                opacity: changed(&e0.opacity, &e1.opacity),
            },
            visible: changed(&before.visible, &after.visible),
            behind_image: changed(&before.behind_image, &after.behind_image),
            font_family: changed(&before.font_family, &after.font_family),
            font_size: changed(&before.font_size, &after.font_size),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: LayerId,
    pub kind: LayerKind,
    /// The text for text layers, the file name for image layers
    pub content: String,
    pub position: Position,
    pub effects: VisualEffects,
    /// Whether the layer is currently visible
    pub visible: bool,
    /// Text only: draw beneath the image layers instead of above them
    pub behind_image: bool,
    pub font_family: String,
    pub font_size: f32,
    /// Pixels for image layers
    pub image: Option<ImageRef>,
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        let same_image = match (&self.image, &other.image) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_image
            && self.id == other.id
            && self.kind == other.kind
            && self.content == other.content
            && self.position == other.position
            && self.effects == other.effects
            && self.visible == other.visible
            && self.behind_image == other.behind_image
            && self.font_family == other.font_family
            && self.font_size == other.font_size
    }
}

impl Layer {
    pub fn new_text(text: &str) -> Self {
        Self {
            id: LayerId::new(),
            kind: LayerKind::Text,
            content: text.to_string(),
            position: DEFAULT_TEXT_POSITION,
            effects: VisualEffects::default(),
            visible: true,
            behind_image: false,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            image: None,
        }
    }

    pub fn new_image(image: ImageRef) -> Self {
        Self {
            id: LayerId::new(),
            kind: LayerKind::Image,
            content: image.name().to_string(),
            position: Position::default(),
            effects: VisualEffects::default(),
            visible: true,
            behind_image: false,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            image: Some(image),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == LayerKind::Text
    }

    /// Merges `patch` into this layer.
    pub fn apply(&mut self, patch: &LayerPatch) {
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        patch.effects.apply(&mut self.effects);
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(behind) = patch.behind_image {
            self.behind_image = behind;
        }
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
        if let Some(size) = patch.font_size {
            self.font_size = size.max(1.0);
        }
    }

    /// Copy with a fresh id, shifted by [`DUPLICATE_OFFSET`] on x and y.
    pub fn duplicate(&self) -> Self {
        Self {
            id: LayerId::new(),
            position: self.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
            ..self.clone()
        }
    }
}
