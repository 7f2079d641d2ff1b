use crate::domain::Exchange;
use crate::models::{ChannelPair, LabelTone, OverlayLabel, PublishedPair};

/// Route a signed ratio to its display channel.
/// Zero (including the neutral substitute) lands on the negative channel.
pub fn split(ratio: f64) -> ChannelPair {
    if ratio > 0.0 {
        ChannelPair {
            positive: ratio,
            negative: 0.0,
        }
    } else {
        ChannelPair {
            positive: 0.0,
            negative: ratio,
        }
    }
}

/// Overlay value for one exchange: the positive channel, or the negative one
/// when the positive channel reads zero.
pub fn overlay_label(exchange: Exchange, published: Option<&PublishedPair>) -> OverlayLabel {
    let Some(published) = published else {
        return OverlayLabel {
            exchange,
            value: None,
            tone: LabelTone::Declining,
        };
    };

    let channels = published.channels;
    let (value, tone) = if channels.positive != 0.0 {
        (channels.positive, LabelTone::Advancing)
    } else {
        (channels.negative, LabelTone::Declining)
    };

    OverlayLabel {
        exchange,
        value: Some(value),
        tone,
    }
}
