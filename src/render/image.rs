use maud::{html, Markup};

/// Width of an image once the viewport is at least `min_viewport` wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTier {
    pub min_viewport: Option<u32>,
    pub width: u32,
}

/// ≥1280px gets 600, >780px gets 500, anything narrower 300.
pub const COVER_TIERS: [ImageTier; 3] = [
    ImageTier {
        min_viewport: Some(1280),
        width: 600,
    },
    ImageTier {
        min_viewport: Some(781),
        width: 500,
    },
    ImageTier {
        min_viewport: None,
        width: 300,
    },
];

const QUALITY: u32 = 75;

/// Asks the Contentful Images API for a resized, cropped rendition.
pub fn optimized_url(src: &str, width: u32, height: u32) -> String {
    let separator = if src.contains('?') { '&' } else { '?' };
    format!("{src}{separator}w={width}&h={height}&fit=fill&q={QUALITY}")
}

/// The widest tier applies first, so `tiers` must be ordered from widest viewport down.
/// The last tier is the `<img>` fallback.
pub fn responsive_image(src: &str, alt: &str, tiers: &[ImageTier], height: u32) -> Markup {
    let fallback_width = tiers.last().map_or(0, |tier| tier.width);

    html! {
        picture.cover-image {
            @for tier in tiers {
                @if let Some(min_viewport) = tier.min_viewport {
                    source
                        media=(format!("(min-width: {min_viewport}px)"))
                        srcset=(optimized_url(src, tier.width, height))
                        width=(tier.width)
                        height=(height);
                }
            }
            img
                src=(optimized_url(src, fallback_width, height))
                alt=(alt)
                width=(fallback_width)
                height=(height)
                loading="lazy";
        }
    }
}
