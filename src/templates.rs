use crate::compositing::Rgba8;
use crate::layer::{EffectsPatch, LayerPatch};
use egui::Color32;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    Minimal,
    Aesthetic,
    Vintage,
    Modern,
    Gradient,
    Creative,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: &'static str,
    pub weight: u16,
    /// Size in rem, scaled by the base font size when applied
    pub size_rem: f32,
}

/// A named text style that can be applied to a text layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub description: &'static str,
    pub primary: FontSpec,
    pub secondary: Option<FontSpec>,
    pub color: Rgba8,
    pub background: Option<Rgba8>,
    pub glitch: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("font weight {0} must be a multiple of 100 between 100 and 900")]
    InvalidWeight(u16),

    #[error("template has no font family")]
    MissingFamily,
}

/// Pixels per rem.
pub const REM_PX: f32 = 16.0;

impl FontTemplate {
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.primary.family.trim().is_empty() {
            return Err(TemplateError::MissingFamily);
        }
        let weight = self.primary.weight;
        if weight % 100 != 0 || !(100..=900).contains(&weight) {
            return Err(TemplateError::InvalidWeight(weight));
        }
        Ok(())
    }

    /// The layer update this template stands for.
    pub fn to_patch(&self) -> Result<LayerPatch, TemplateError> {
        self.validate()?;
        let [r, g, b, a] = self.color.to_array();
        Ok(LayerPatch {
            font_family: Some(self.primary.family.to_string()),
            font_size: Some(self.primary.size_rem * REM_PX),
            effects: EffectsPatch {
                color: Some(Color32::from_rgba_unmultiplied(r, g, b, a)),
                animation: self.glitch.then_some(crate::layer::AnimationKind::Glitch),
                ..Default::default()
            },
            ..Default::default()
        })
    }
}

const fn font(family: &'static str, weight: u16, size_rem: f32) -> FontSpec {
    FontSpec {
        family,
        weight,
        size_rem,
    }
}

const fn hex(rgb: u32) -> Rgba8 {
    Rgba8::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
}

pub const TEMPLATES: &[FontTemplate] = &[
    FontTemplate {
        id: "minimal-contrast",
        name: "Minimal Contrast",
        category: TemplateCategory::Minimal,
        description: "Bold headlines with delicate subtext",
        primary: font("Montserrat", 800, 4.0),
        secondary: Some(font("Cormorant Garamond", 300, 1.5)),
        color: hex(0x1a1a1a),
        background: Some(hex(0xf8f8f8)),
        glitch: false,
    },
    FontTemplate {
        id: "dreamy-aesthetic",
        name: "Dreamy Aesthetic",
        category: TemplateCategory::Aesthetic,
        description: "Soft, ethereal typography with gradient effects",
        primary: font("Ginger", 500, 3.5),
        secondary: Some(font("La Belle Aurore", 400, 2.0)),
        color: hex(0xff758c),
        background: Some(hex(0xfff0f3)),
        glitch: false,
    },
    FontTemplate {
        id: "vintage-fade",
        name: "Vintage Fade",
        category: TemplateCategory::Vintage,
        description: "Classic typography with elegant fade-out effect",
        primary: font("Butler", 600, 4.0),
        secondary: Some(font("Old Standard TT", 400, 1.2)),
        color: hex(0x2c1810),
        background: Some(hex(0xf4e4bc)),
        glitch: false,
    },
    FontTemplate {
        id: "neon-nights",
        name: "Neon Nights",
        category: TemplateCategory::Modern,
        description: "Bold neon-inspired typography with glow effects",
        primary: font("Clash Display", 700, 5.0),
        secondary: None,
        color: hex(0x00fff5),
        background: Some(hex(0x0a0a0a)),
        glitch: false,
    },
    FontTemplate {
        id: "pastel-dreams",
        name: "Pastel Dreams",
        category: TemplateCategory::Aesthetic,
        description: "Soft pastel gradients with dreamy typography",
        primary: font("Recoleta", 500, 3.8),
        secondary: Some(font("Quicksand", 300, 1.4)),
        color: hex(0xe0c3fc),
        background: Some(hex(0xffffff)),
        glitch: false,
    },
    FontTemplate {
        id: "brutalist-bold",
        name: "Brutalist Bold",
        category: TemplateCategory::Modern,
        description: "Strong, impactful typography with harsh contrasts",
        primary: font("Obviously", 900, 6.0),
        secondary: Some(font("Space Mono", 400, 1.0)),
        color: hex(0x000000),
        background: Some(hex(0xffffff)),
        glitch: false,
    },
    FontTemplate {
        id: "kawaii-cute",
        name: "Kawaii Cute",
        category: TemplateCategory::Aesthetic,
        description: "Playful and cute Japanese-inspired typography",
        primary: font("Varela Round", 400, 3.2),
        secondary: Some(font("M PLUS Rounded 1c", 300, 1.2)),
        color: hex(0xff9ed8),
        background: Some(hex(0xfff0f9)),
        glitch: false,
    },
    FontTemplate {
        id: "vaporwave",
        name: "Vaporwave",
        category: TemplateCategory::Aesthetic,
        description: "Retro-futuristic aesthetic with bold gradients",
        primary: font("VCR OSD Mono", 400, 4.5),
        secondary: Some(font("Helios", 700, 1.8)),
        color: hex(0xff71ce),
        background: Some(hex(0x1a1a1a)),
        glitch: false,
    },
    FontTemplate {
        id: "minimalist-fade",
        name: "Minimalist Fade",
        category: TemplateCategory::Minimal,
        description: "Clean typography with elegant fade effects",
        primary: font("Made Gentle", 300, 5.0),
        secondary: None,
        color: hex(0x333333),
        background: Some(hex(0xffffff)),
        glitch: false,
    },
    FontTemplate {
        id: "korean-aesthetic",
        name: "K-Style",
        category: TemplateCategory::Aesthetic,
        description: "Modern Korean typography style",
        primary: font("Pretendard", 600, 4.2),
        secondary: Some(font("IBM Plex Sans KR", 200, 1.4)),
        color: hex(0x000000),
        background: Some(hex(0xf3f3f3)),
        glitch: false,
    },
    FontTemplate {
        id: "glitch-aesthetic",
        name: "Glitch Effect",
        category: TemplateCategory::Creative,
        description: "Cyberpunk-inspired glitch typography",
        primary: font("Basement Grotesque", 800, 5.5),
        secondary: None,
        color: hex(0x00ff00),
        background: Some(hex(0x000000)),
        glitch: true,
    },
];

pub fn find(id: &str) -> Option<&'static FontTemplate> {
    TEMPLATES.iter().find(|template| template.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{AnimationKind, Layer};

    #[test]
    fn catalogue_is_valid_and_unique() {
        for template in TEMPLATES {
            assert_eq!(template.validate(), Ok(()), "{}", template.id);
            assert_eq!(TEMPLATES.iter().filter(|t| t.id == template.id).count(), 1);
        }
    }

    #[test]
    fn bad_weights_are_rejected() {
        let mut template = TEMPLATES[0];
        template.primary.weight = 450;
        assert_eq!(template.validate(), Err(TemplateError::InvalidWeight(450)));
        template.primary.weight = 1000;
        assert!(template.to_patch().is_err());
    }

    #[test]
    fn patch_restyles_a_text_layer() {
        let mut layer = Layer::new_text("hello");
        let template = find("glitch-aesthetic").unwrap();
        layer.apply(&template.to_patch().unwrap());
        assert_eq!(layer.font_family, "Basement Grotesque");
        assert_eq!(layer.font_size, 5.5 * REM_PX);
        assert_eq!(layer.effects.color, Color32::from_rgb(0, 255, 0));
        assert_eq!(layer.effects.animation, AnimationKind::Glitch);
        assert_eq!(layer.content, "hello");
    }
}
